use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = lesson_tts::cli::Cli::parse();
    lesson_tts::run(cli)
}
