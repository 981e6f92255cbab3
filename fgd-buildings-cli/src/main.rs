use anyhow::{Context, Result};
use clap::Parser;
use fgd_buildings::zip_handler::ZIP_EXTENSION;
use fgd_buildings::{BatchConverter, CancelFlag, ConvertOptions, ProgressEvent, RawArchive};
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 入力ZIPファイル、またはZIPを含むディレクトリ（複数指定可）
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// 出力GeoJSONファイル（省略時は入力ファイル名から決定）
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// 並列処理スレッド数（デフォルト: CPUコア数）
    #[arg(short, long)]
    threads: Option<usize>,

    /// 入力ZIPを1つずつ順番に処理
    #[arg(long)]
    sequential: bool,

    /// 各ZIPで処理するサブZIPの最大数（テスト用）
    #[arg(long, value_name = "N")]
    max_sub_archives: Option<usize>,

    /// インデントなしで出力
    #[arg(long)]
    compact: bool,

    /// 変換結果の先頭N件を表示
    #[arg(long, value_name = "N")]
    preview: Option<usize>,
}

fn main() -> Result<()> {
    // ログの初期化
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // CLI引数の解析
    let args = Args::parse();

    // 処理開始時間を記録
    let start_time = std::time::Instant::now();

    // スレッドプールの設定
    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to build thread pool")?;
    }

    // 入力パスの処理
    let input_files = resolve_inputs(&args.inputs)?;
    if input_files.is_empty() {
        error!("No ZIP files found in {:?}", args.inputs);
        anyhow::bail!("Input must contain at least one .zip file");
    }
    info!("Found {} input ZIP files", input_files.len());

    let archives = input_files
        .iter()
        .map(|path| read_archive(path))
        .collect::<Result<Vec<_>>>()?;

    let converter = BatchConverter::new(ConvertOptions {
        parallel: !args.sequential,
        max_sub_archives: args.max_sub_archives,
        pretty: !args.compact,
    });

    let progress = |event: &ProgressEvent<'_>| {
        if let ProgressEvent::ArchiveStarted {
            archive,
            index,
            total,
        } = event
        {
            info!("Processing ({}/{}): {}", index + 1, total, archive);
        }
    };
    let report = converter.convert(&archives, &progress, &CancelFlag::new())?;

    if report.is_empty() {
        error!("No building data found. Check the contents of the ZIP files.");
        anyhow::bail!("No building data (-BldA-) found in {} inputs", archives.len());
    }

    // 出力ファイル名の決定
    let output_path = match args.output {
        Some(path) => path,
        None => PathBuf::from(
            report
                .output_file_name()
                .context("Failed to derive output file name")?,
        ),
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    converter
        .writer()
        .write_file(report.collection.features(), &output_path)?;

    println!("Processed ZIP files: {}", report.summary.inputs);
    println!("Buildings: {}", report.summary.features);
    println!("Output size: {:.2} MB", report.summary.size_mb());
    println!("Output file: {}", output_path.display());
    if !report.warnings.is_empty() {
        println!("Warnings: {}", report.warnings.len());
    }

    if let Some(n) = args.preview {
        let preview = report.collection.preview(n);
        println!("{}", serde_json::to_string_pretty(&preview)?);
    }

    // 処理時間を表示
    let elapsed = start_time.elapsed();
    info!("Total processing time: {:?}", elapsed);

    Ok(())
}

fn read_archive(path: &Path) -> Result<RawArchive> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context(format!("Invalid file name: {:?}", path))?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(RawArchive::new(name, bytes))
}

fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if !is_zip(input) {
                error!("Unsupported file type: {:?}", input);
                anyhow::bail!("Input file must be .zip: {:?}", input);
            }
            files.push(input.clone());
        } else if input.is_dir() {
            // ディレクトリの処理
            info!("Processing directory: {:?}", input);
            files.extend(collect_input_files(input)?);
        } else {
            error!("Invalid input path: {:?}", input);
            anyhow::bail!("Input path must be a file or directory: {:?}", input);
        }
    }

    Ok(files)
}

fn is_zip(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.ends_with(ZIP_EXTENSION))
}

/// ディレクトリ以下のZIPファイルをパス順に収集する
fn collect_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    use rayon::prelude::*;
    use std::sync::Mutex;

    let files = Mutex::new(Vec::new());

    // ディレクトリエントリを並列で収集
    let entries: Result<Vec<_>, _> = fs::read_dir(dir)?.collect();
    let entries = entries?;

    entries
        .into_par_iter()
        .try_for_each(|entry| -> Result<()> {
            let path = entry.path();

            if path.is_dir() {
                // サブディレクトリを再帰的に探索
                let sub_files = collect_input_files(&path)?;
                if !sub_files.is_empty() {
                    files.lock().unwrap().extend(sub_files);
                }
            } else if is_zip(&path) {
                files.lock().unwrap().push(path);
            }
            Ok(())
        })?;

    // 並列収集の順序は不定なので並べ替える
    let mut files = files.into_inner().unwrap();
    files.sort();
    Ok(files)
}
