use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Backend;

#[derive(Parser, Debug)]
#[command(name = "lesson-tts", version, about = "Generate lesson audio files with text-to-speech")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Generate(GenerateArgs),
    Lessons(LessonsArgs),
    Synthesize(SynthesizeArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, value_enum, help = "Override TTS backend")]
    pub backend: Option<Backend>,

    #[arg(long, value_name = "DIR", help = "Override output directory")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Lesson catalog JSON (defaults to built-in lessons)")]
    pub lessons: Option<PathBuf>,

    #[arg(long = "only", value_name = "ID", help = "Only generate these lesson ids")]
    pub only: Vec<String>,

    #[arg(long, help = "Print the run report as JSON")]
    pub json: bool,

    #[arg(long, help = "Exit with an error if any lesson failed")]
    pub fail_on_error: bool,
}

#[derive(Args, Debug)]
pub struct LessonsArgs {
    #[arg(long, value_name = "PATH", help = "Lesson catalog JSON (defaults to built-in lessons)")]
    pub lessons: Option<PathBuf>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SynthesizeArgs {
    #[arg(long, help = "Text to synthesize")]
    pub text: String,

    #[arg(long, value_enum, help = "TTS backend")]
    pub backend: Option<Backend>,

    #[arg(long, value_name = "PATH", help = "Save audio to file")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Show current config as JSON")]
    pub show: bool,

    #[arg(long, help = "Create default config file")]
    pub init: bool,

    #[arg(long, help = "Validate configuration")]
    pub validate: bool,
}
