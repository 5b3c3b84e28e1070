mod render;

use std::fs;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nanostyle_contracts::assets::{AssetCategory, AssetRecord, ImageAsset};
use nanostyle_contracts::chat::{parse_intent, Intent, WIZARD_HELP_COMMANDS};
use nanostyle_contracts::encoding::ImageEncoding;
use nanostyle_contracts::events::{payload, EventWriter};
use nanostyle_contracts::workflow::{select_at, Stage, WorkflowState};
use nanostyle_engine::{
    default_controller, upload_file, DefaultController, DryrunGenerator, DynGenerator,
    GeminiConfig, GeminiGenerator,
};
use serde_json::json;

use crate::render::render_screen;

const DEFAULT_RESULT_STEM: &str = "nanostyle-result";

#[derive(Debug, Parser)]
#[command(name = "nanostyle", version, about = "Virtual try-on with AI image generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the preset people and outfits.
    Presets,
    /// Generate an outfit image from a description.
    Outfit(OutfitArgs),
    /// Dress a person in an outfit in one shot.
    TryOn(TryOnArgs),
    /// Step through person, outfit and result interactively.
    Wizard(WizardArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Provider {
    Gemini,
    Dryrun,
}

#[derive(Debug, Clone, Args)]
struct BackendArgs {
    #[arg(long, value_enum, default_value_t = Provider::Gemini)]
    provider: Provider,
    /// Image model for the Gemini provider.
    #[arg(long)]
    model: Option<String>,
    /// Append session events to this JSONL file.
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct OutfitArgs {
    #[arg(long)]
    prompt: String,
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Debug, Parser)]
struct TryOnArgs {
    /// Preset id, image path or http(s) URL.
    #[arg(long)]
    person: String,
    /// Preset id, image path or http(s) URL.
    #[arg(long)]
    outfit: String,
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Debug, Parser)]
struct WizardArgs {
    #[command(flatten)]
    backend: BackendArgs,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("nanostyle error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Presets => run_presets(),
        Command::Outfit(args) => run_outfit(args),
        Command::TryOn(args) => run_try_on(args),
        Command::Wizard(args) => {
            run_wizard(args)?;
            Ok(0)
        }
    }
}

struct Session {
    flow: DefaultController,
    events: Option<EventWriter>,
    model_label: String,
}

impl Session {
    fn open(backend: &BackendArgs, state: WorkflowState) -> Result<Self> {
        let (generator, model_label) = match backend.provider {
            Provider::Gemini => {
                let mut config = GeminiConfig::from_env();
                if let Some(model) = backend.model.as_deref() {
                    config = config.with_model(model);
                }
                let label = config.model.clone();
                let generator: DynGenerator = Box::new(GeminiGenerator::new(config));
                (generator, label)
            }
            Provider::Dryrun => {
                let generator: DynGenerator = Box::new(DryrunGenerator);
                (generator, "dryrun".to_string())
            }
        };

        let mut flow = default_controller(generator, state);
        let events = backend.events.as_ref().map(EventWriter::for_new_session);
        if let Some(writer) = events.as_ref() {
            writer
                .emit("session_started", payload(json!({ "model": model_label })))
                .with_context(|| format!("failed writing {}", writer.path().display()))?;
            flow = flow.with_events(writer.clone());
        }

        Ok(Self {
            flow,
            events,
            model_label,
        })
    }

    fn emit(&self, event_type: &str, value: serde_json::Value) {
        if let Some(writer) = self.events.as_ref() {
            if let Err(err) = writer.emit(event_type, payload(value)) {
                eprintln!("nanostyle: failed to record {event_type} event: {err:#}");
            }
        }
    }

    fn upload(&mut self, category: AssetCategory, path: &Path) -> Result<String> {
        let mut uploaded = None;
        upload_file(path, |encoding, filename| {
            uploaded = Some(self.flow.add_uploaded_asset(encoding, category, filename));
        })?;
        uploaded.with_context(|| format!("upload of {} produced no asset", path.display()))
    }

    fn save_result(&self, out: &Path) -> Result<PathBuf> {
        let Some(image) = self.flow.result_image() else {
            bail!("no result image to save");
        };
        let path = write_image(image, out)?;
        self.emit(
            "result_saved",
            json!({ "path": path.to_string_lossy(), "bytes": image.len() }),
        );
        Ok(path)
    }
}

fn run_presets() -> Result<i32> {
    let state = WorkflowState::with_presets();
    let listing = json!({
        "people": records(&state.people),
        "outfits": records(&state.outfits),
    });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(0)
}

fn records(assets: &[ImageAsset]) -> Vec<AssetRecord<'_>> {
    assets.iter().map(|asset| asset.record(false)).collect()
}

fn run_outfit(args: OutfitArgs) -> Result<i32> {
    let mut session = Session::open(&args.backend, WorkflowState::with_presets())?;
    session.flow.set_outfit_prompt(&args.prompt);
    if !session.flow.request_outfit_generation(&args.prompt) {
        bail!("outfit description is empty");
    }
    if let Some(error) = session.flow.error() {
        eprintln!("Outfit generation failed: {error}");
        return Ok(1);
    }
    let Some(ImageAsset { source, .. }) = session.flow.state().outfits.first() else {
        bail!("outfit generation produced no asset");
    };
    let Some(image) = source.as_embedded() else {
        bail!("generated outfit has no inline image");
    };
    let path = write_image(image, &args.out)?;
    println!("Outfit saved to {}", path.display());
    Ok(0)
}

fn run_try_on(args: TryOnArgs) -> Result<i32> {
    let mut state = WorkflowState::with_presets();
    let person = AssetRef::prepare(&mut state, AssetCategory::Person, &args.person);
    let outfit = AssetRef::prepare(&mut state, AssetCategory::Outfit, &args.outfit);
    let mut session = Session::open(&args.backend, state)?;

    let person_id = person.attach(&mut session, AssetCategory::Person)?;
    let outfit_id = outfit.attach(&mut session, AssetCategory::Outfit)?;
    session.flow.select_person(&person_id);
    if session.flow.advance() != Stage::SelectOutfit {
        bail!("could not select person {}", args.person);
    }
    session.flow.select_outfit(&outfit_id);
    if session.flow.advance() != Stage::Result {
        let error = session.flow.error().unwrap_or("try-on did not complete");
        eprintln!("Try-on failed: {error}");
        return Ok(1);
    }

    let path = session.save_result(&args.out)?;
    println!("Result saved to {}", path.display());
    Ok(0)
}

enum AssetRef {
    Existing(String),
    File(PathBuf),
}

impl AssetRef {
    fn prepare(state: &mut WorkflowState, category: AssetCategory, raw: &str) -> Self {
        let raw = raw.trim();
        if state.assets(category).iter().any(|asset| asset.id == raw) {
            return Self::Existing(raw.to_string());
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let id = format!("url-{}", category.as_str());
            let asset = ImageAsset::preset(&id, category, raw, raw);
            match category {
                AssetCategory::Person => state.people.insert(0, asset),
                AssetCategory::Outfit => state.outfits.insert(0, asset),
            }
            return Self::Existing(id);
        }
        Self::File(PathBuf::from(raw))
    }

    fn attach(self, session: &mut Session, category: AssetCategory) -> Result<String> {
        match self {
            Self::Existing(id) => Ok(id),
            Self::File(path) => session.upload(category, &path),
        }
    }
}

fn run_wizard(args: WizardArgs) -> Result<()> {
    let mut session = Session::open(&args.backend, WorkflowState::with_presets())?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    println!("{} started. Type /help for commands.", render::APP_TITLE);
    print_screen(&session);

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match input.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let intent = parse_intent(line.trim_end_matches(['\n', '\r']));
        match handle_intent(&mut session, &intent) {
            Step::Quit => break,
            Step::Redraw => print_screen(&session),
            Step::Stay => {}
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Redraw,
    Stay,
    Quit,
}

fn handle_intent(session: &mut Session, intent: &Intent) -> Step {
    match intent.action.as_str() {
        "noop" => Step::Stay,
        "help" => {
            println!("Commands: {}", WIZARD_HELP_COMMANDS.join(" "));
            Step::Stay
        }
        "show" => Step::Redraw,
        "quit" => Step::Quit,
        "advance" => {
            let state = session.flow.state();
            if state.stage == Stage::SelectOutfit && state.can_proceed_to_result() {
                println!("Visualizing look…");
            }
            session.flow.advance();
            Step::Redraw
        }
        "go_back" => {
            session.flow.go_back();
            Step::Redraw
        }
        "dismiss_error" => {
            session.flow.dismiss_error();
            Step::Redraw
        }
        "select" => match intent.arg("text") {
            Some(target) => select_target(session, target),
            None => {
                println!("/select requires a number or id");
                Step::Stay
            }
        },
        "set_prompt" => {
            session.flow.set_outfit_prompt(intent.arg("text").unwrap_or_default());
            Step::Redraw
        }
        "generate_outfit" => {
            let prompt = intent
                .arg("text")
                .map(str::to_string)
                .unwrap_or_else(|| session.flow.state().outfit_prompt.clone());
            generate_outfit(session, &prompt)
        }
        "text" => {
            let text = intent.text.clone().unwrap_or_default();
            match session.flow.stage() {
                Stage::SelectOutfit => generate_outfit(session, &text),
                Stage::SelectPerson => select_target(session, &text),
                Stage::Result => {
                    println!("Use /back to try another outfit or /save to download.");
                    Step::Stay
                }
            }
        }
        "upload" => {
            let Some(path) = intent.arg("path") else {
                println!("/upload requires a path");
                return Step::Stay;
            };
            let category = match session.flow.stage() {
                Stage::SelectPerson => AssetCategory::Person,
                Stage::SelectOutfit => AssetCategory::Outfit,
                Stage::Result => {
                    println!("Go /back to upload another outfit.");
                    return Step::Stay;
                }
            };
            match session.upload(category, Path::new(path)) {
                Ok(_) => Step::Redraw,
                Err(err) => {
                    println!("Upload failed: {err:#}");
                    Step::Stay
                }
            }
        }
        "save_result" => {
            let default_out = PathBuf::from(format!("{DEFAULT_RESULT_STEM}.png"));
            let out = intent.arg("path").map(PathBuf::from).unwrap_or(default_out);
            match session.save_result(&out) {
                Ok(path) => println!("Saved {}", path.display()),
                Err(err) => println!("Save failed: {err:#}"),
            }
            Step::Stay
        }
        _ => {
            println!("Unknown command. Type /help for commands.");
            Step::Stay
        }
    }
}

fn generate_outfit(session: &mut Session, prompt: &str) -> Step {
    if prompt.trim().is_empty() {
        println!("Describe the outfit first, e.g. /generate a vintage red leather jacket");
        return Step::Stay;
    }
    if session.flow.stage() != Stage::SelectOutfit {
        println!("Outfits can be generated on the outfit step (/next).");
        return Step::Stay;
    }
    session.flow.set_outfit_prompt(prompt);
    println!("Generating outfit…");
    session.flow.request_outfit_generation(prompt);
    Step::Redraw
}

fn select_target(session: &mut Session, target: &str) -> Step {
    let category = match session.flow.stage() {
        Stage::SelectPerson => AssetCategory::Person,
        Stage::SelectOutfit => AssetCategory::Outfit,
        Stage::Result => {
            println!("Nothing to select on the result step.");
            return Step::Stay;
        }
    };
    let assets = session.flow.state().assets(category).to_vec();
    let flow = &mut session.flow;
    let selected = match target.trim().parse::<usize>() {
        Ok(position) if position > 0 => select_at(&assets, position - 1, |asset| {
            flow.select(category, &asset.id);
        }),
        _ => flow.select(category, target.trim()),
    };
    if !selected {
        println!("No {} matches {target}", category.as_str());
        return Step::Stay;
    }
    Step::Redraw
}

fn print_screen(session: &Session) {
    println!();
    println!(
        "{}",
        render_screen(session.flow.state(), session.flow.is_busy(), &session.model_label)
    );
}

fn write_image(image: &ImageEncoding, out: &Path) -> Result<PathBuf> {
    let path = out.with_extension(image.extension());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(&path, &image.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
