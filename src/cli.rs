use crate::config::{Config, load_config};
use crate::generate::{GHERKIN_SECTION, GenerationError, RequestState, Session, TextGenerator, Tool};
use crate::input::load_entries;
use crate::ir::ParsedDocument;
use crate::layout::{Diagram, Layout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::parser::{extract_section, parse_document};
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "auditviz",
    version,
    about = "Gherkin scenario trees, skill radar charts and security tool prompts"
)]
pub struct Args {
    /// Config JSON5 file (theme, themeVariables, radar, tree, generation)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a radar chart from a JSON list of {label, value, category}
    Radar(RadarArgs),
    /// Render Feature/Scenario/step text as a tree diagram
    Visualize(VisualizeArgs),
    /// Send input through one of the text-generation tools
    Generate(GenerateArgs),
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Also write the computed layout as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct RadarArgs {
    /// Input file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Index of the point drawn in its hovered state
    #[arg(long = "hover")]
    pub hover: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ClapArgs, Debug)]
pub struct VisualizeArgs {
    /// Input file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Parse the whole input even if it has a "### GHERKIN SCENARIOS" section
    #[arg(long = "raw")]
    pub raw: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// blueprint, audit, architecture or explain
    #[arg(short = 't', long = "tool", default_value = "blueprint")]
    pub tool: Tool,

    /// Input file or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Use the tool's built-in sample input
    #[arg(long = "sample")]
    pub sample: bool,

    /// Write the response text here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Render the Gherkin section of a blueprint response to this SVG file
    #[arg(long = "visual")]
    pub visual: Option<PathBuf>,

    /// Write the diagram block of an architecture response to this file
    #[arg(long = "diagramOut")]
    pub diagram_out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Radar(radar) => run_radar(radar, &config),
        Command::Visualize(visualize) => run_visualize(visualize, &config),
        Command::Generate(generate) => run_generate(generate, &config),
    }
}

fn run_radar(args: RadarArgs, config: &Config) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let entries = load_entries(&input)?;
    let layout = compute_layout(&Diagram::Radar(entries), &config.theme, &config.layout);
    emit(&layout, args.hover, &args.output, config)
}

fn run_visualize(args: VisualizeArgs, config: &Config) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let doc = document_from_text(&input, args.raw);
    if doc.is_empty() {
        tracing::warn!("no scenarios found in input");
    }
    let layout = compute_layout(&Diagram::Document(doc), &config.theme, &config.layout);
    emit(&layout, None, &args.output, config)
}

fn document_from_text(input: &str, raw: bool) -> ParsedDocument {
    if !raw && let Some(section) = extract_section(input, GHERKIN_SECTION) {
        return parse_document(&section);
    }
    parse_document(input)
}

#[cfg(feature = "gemini")]
fn run_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    use crate::generate::GeminiClient;

    let input = if args.sample {
        args.tool.sample_input().to_string()
    } else {
        read_input(args.input.as_deref())?
    };
    tracing::info!(tool = %args.tool, "running generation tool");
    let state = request(GeminiClient::from_config(&config.generation), args.tool, &input)?;

    let output = match state {
        RequestState::Done(output) => output,
        RequestState::Failed(message) => {
            println!("{message}");
            return Ok(());
        }
        RequestState::Idle | RequestState::Pending { .. } => return Ok(()),
    };

    match args.output.as_deref() {
        Some(path) => std::fs::write(path, &output.text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", output.text),
    }

    if let Some(path) = args.visual.as_deref() {
        let doc = output.document().unwrap_or_default();
        let layout = compute_layout(&Diagram::Document(doc), &config.theme, &config.layout);
        let svg = render_svg(&layout, None, &config.theme, &config.layout);
        write_output_svg(&svg, Some(path))?;
    }
    if let Some(path) = args.diagram_out.as_deref() {
        match output.diagram_source() {
            Some(diagram) => std::fs::write(path, diagram)?,
            None => tracing::warn!(tool = %args.tool, "response has no diagram block"),
        }
    }
    Ok(())
}

#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
fn request<G: TextGenerator>(
    client: Result<G, GenerationError>,
    tool: Tool,
    input: &str,
) -> Result<RequestState> {
    let mut session = Session::new();
    Ok(session.run_with(client, tool, input)?.clone())
}

#[cfg(not(feature = "gemini"))]
fn run_generate(_args: GenerateArgs, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "built without the `gemini` feature; text generation is unavailable"
    ))
}

fn emit(layout: &Layout, hovered: Option<usize>, output: &OutputArgs, config: &Config) -> Result<()> {
    if let Some(path) = output.dump_layout.as_deref() {
        write_layout_dump(path, layout)?;
    }
    let svg = render_svg(layout, hovered, &config.theme, &config.layout);
    match output.output_format {
        OutputFormat::Svg => write_output_svg(&svg, output.output.as_deref()),
        OutputFormat::Png => write_png(&svg, output.output.as_deref(), config),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = ensure_output(output, "png")?;
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("built without the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}
