use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "agit", version)]
#[command(
    about = "agit is an assistant agent that translates natural language to git commands.",
    long_about = None,
    after_help = "Ensure your API key is set as an environment variable: OPENAI_API_KEY, or ANTHROPIC_API_KEY for the anthropic provider."
)]
pub struct Cli {
    /// The natural language request to translate into a git command
    pub command: Vec<String>,

    /// Print an extended explanation of the command; without a request, print usage documentation
    #[arg(long)]
    pub explain: bool,

    /// Log the prompt and the raw model response
    #[arg(long)]
    pub debug: bool,

    /// Review current un-staged changes against the latest revision; words become review focus
    #[arg(long)]
    pub review: bool,
}

impl Cli {
    pub fn request(&self) -> String {
        self.command.join(" ")
    }
}
