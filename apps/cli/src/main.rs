use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use printbridge_printing::{
    export_rich_text_pdf, split_runs, LayoutOptions, Margin, Orientation, PageGeometry, PaperId,
    PaperSize, VariantKind,
};
use printbridge_settings::{LayoutPreferences, PreferencesStore};
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "printbridge-cli",
    about = "Render inline-markup documents and manage print preferences",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 偏好設定檔路徑。 / Preferences file (defaults to `<workspace>/.printbridge/preferences.json`).
    #[arg(long, global = true, value_name = "PATH")]
    preferences: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 將標記文字轉為 PDF。 / Lay out a markup document and write it as PDF.
    Render(RenderArgs),
    /// 顯示每行的樣式分段。 / Show how each line splits into styled runs.
    Runs(RunsArgs),
    /// 管理列印偏好設定。 / Manage print preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Args)]
struct RenderArgs {
    /// 輸入的標記文字檔。 / Markup text file.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// 輸出的 PDF 路徑。 / Destination PDF path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// 覆寫字型家族。 / Override the font family.
    #[arg(long, value_name = "NAME")]
    font_family: Option<String>,

    /// 覆寫字型大小（點）。 / Override the font size in points.
    #[arg(long, value_name = "PT")]
    font_size: Option<u32>,

    /// 以橫向輸出。 / Lay pages out in landscape.
    #[arg(long)]
    landscape: bool,
}

#[derive(Args)]
struct RunsArgs {
    /// 輸入的標記文字檔。 / Markup text file.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// 以 JSON 輸出。 / Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 顯示目前偏好設定。 / Show current preferences.
    Show,
    /// 修改單一設定值。 / Set one value by key (see `show` for keys).
    Set(PreferencesSetArgs),
    /// 匯出目前偏好設定。 / Export current preferences.
    Export(PreferencesExportArgs),
    /// 匯入偏好設定 JSON。 / Import preferences from JSON.
    Import(PreferencesImportArgs),
}

#[derive(Args)]
struct PreferencesSetArgs {
    #[arg(value_name = "KEY")]
    key: String,
    #[arg(value_name = "VALUE")]
    value: String,
}

#[derive(Args)]
struct PreferencesExportArgs {
    /// 輸出檔案路徑。 / Destination file path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PreferencesImportArgs {
    /// 輸入檔案路徑。 / Source preferences JSON.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        preferences,
        command,
    } = Cli::parse();
    let prefs_path = match preferences {
        Some(path) => resolve_input_path(&path)?,
        None => default_preferences_path(&resolve_workspace(workspace)?),
    };

    match command {
        Commands::Render(args) => execute_render(args, &prefs_path),
        Commands::Runs(args) => execute_runs(args),
        Commands::Preferences(subcommand) => execute_preferences_command(subcommand, &prefs_path),
    }
}

fn execute_render(args: RenderArgs, prefs_path: &Path) -> Result<()> {
    let store = load_store(prefs_path)?;
    let mut layout_prefs = store.preferences().layout.clone();
    if let Some(family) = args.font_family {
        layout_prefs.font_family = family;
    }
    if let Some(size) = args.font_size {
        layout_prefs.font_size_pt = size.clamp(4, 144);
    }
    if args.landscape {
        layout_prefs.landscape = true;
    }

    let input = resolve_input_path(&args.input)?;
    let content = read_markup(&input)?;
    let geometry = page_geometry(&layout_prefs)?;
    let export = export_rich_text_pdf(&content, &layout_options(&layout_prefs), geometry)
        .with_context(|| format!("failed to render {}", input.display()))?;

    let output = resolve_input_path(&args.output)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&output, &export.pdf_data)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {} bytes to {}", export.pdf_data.len(), output.display());
    println!(
        "Rendered {} lines on {} page(s) to {}",
        export.summary.total_lines,
        export.summary.total_pages,
        output.display()
    );
    Ok(())
}

fn execute_runs(args: RunsArgs) -> Result<()> {
    let input = resolve_input_path(&args.input)?;
    let content = read_markup(&input)?;

    if args.json {
        let lines: Vec<_> = content
            .lines()
            .map(|line| {
                let runs = split_runs(line);
                json!({
                    "line": line,
                    "large": runs.large_seen,
                    "runs": runs
                        .runs
                        .iter()
                        .map(|run| json!({ "text": run.text, "variant": variant_name(run.style.variant()) }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        let payload =
            serde_json::to_string_pretty(&lines).context("failed to serialize runs")?;
        println!("{payload}");
        return Ok(());
    }

    for (index, line) in content.lines().enumerate() {
        for run in split_runs(line).runs {
            println!(
                "{}\t{}\t{:?}",
                index + 1,
                variant_name(run.style.variant()),
                run.text
            );
        }
    }
    Ok(())
}

fn execute_preferences_command(command: PreferencesCommand, prefs_path: &Path) -> Result<()> {
    match command {
        PreferencesCommand::Show => show_preferences(prefs_path),
        PreferencesCommand::Set(args) => set_preference(args, prefs_path),
        PreferencesCommand::Export(args) => export_preferences(args, prefs_path),
        PreferencesCommand::Import(args) => import_preferences(args, prefs_path),
    }
}

fn show_preferences(prefs_path: &Path) -> Result<()> {
    let store = load_store(prefs_path)?;
    for (key, value) in store.preferences().entries() {
        println!("{key} = {value}");
    }
    Ok(())
}

fn set_preference(args: PreferencesSetArgs, prefs_path: &Path) -> Result<()> {
    let mut store = load_store(prefs_path)?;
    store
        .preferences_mut()
        .set(&args.key, &args.value)
        .with_context(|| format!("failed to set {}", args.key))?;
    store
        .save()
        .with_context(|| format!("failed to save preferences to {}", prefs_path.display()))?;
    println!("Set {} in {}", args.key, prefs_path.display());
    Ok(())
}

fn export_preferences(args: PreferencesExportArgs, prefs_path: &Path) -> Result<()> {
    let store = load_store(prefs_path)?;
    let output = resolve_input_path(&args.output)?;
    store
        .export_to(&output)
        .with_context(|| format!("failed to export preferences to {}", output.display()))?;
    println!("Exported preferences to {}", output.display());
    Ok(())
}

fn import_preferences(args: PreferencesImportArgs, prefs_path: &Path) -> Result<()> {
    let mut store = load_store(prefs_path)?;
    let input = resolve_input_path(&args.input)?;
    if !input.exists() {
        bail!("preferences file '{}' does not exist", input.display());
    }
    store
        .import_from(&input)
        .with_context(|| format!("failed to import preferences from {}", input.display()))?;
    println!("Imported preferences from {}", input.display());
    Ok(())
}

fn load_store(prefs_path: &Path) -> Result<PreferencesStore> {
    PreferencesStore::load(prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))
}

fn read_markup(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn layout_options(prefs: &LayoutPreferences) -> LayoutOptions {
    LayoutOptions {
        font_family: prefs.font_family.clone(),
        font_size_pt: prefs.font_size_pt as f32,
        line_spacing: prefs.line_spacing(),
        margins: Margin {
            top: prefs.margin_top_pt as f32,
            bottom: prefs.margin_bottom_pt as f32,
            left: prefs.margin_left_pt as f32,
            right: prefs.margin_right_pt as f32,
        },
    }
}

fn page_geometry(prefs: &LayoutPreferences) -> Result<PageGeometry> {
    let id = match prefs.paper.as_str() {
        "A3" => PaperId::A3,
        "A4" => PaperId::A4,
        "Letter" => PaperId::Letter,
        "Legal" => PaperId::Legal,
        other => bail!("unsupported paper '{other}'"),
    };
    let paper: PaperSize = PaperSize::standard(id)
        .with_context(|| format!("no dimensions for paper '{}'", prefs.paper))?;
    Ok(PageGeometry {
        paper,
        orientation: if prefs.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        },
        dpi: prefs.dpi as i32,
    })
}

fn variant_name(kind: VariantKind) -> &'static str {
    match kind {
        VariantKind::Normal => "normal",
        VariantKind::Bold => "bold",
        VariantKind::Italic => "italic",
        VariantKind::BoldItalic => "bold-italic",
        VariantKind::Large => "large",
    }
}

fn default_preferences_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".printbridge").join("preferences.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
