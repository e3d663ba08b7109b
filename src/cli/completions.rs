use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    electron-bundler completions bash > ~/.bash_completion.d/electron-bundler\n\n\
                  Generate zsh completions:\n    electron-bundler completions zsh > ~/.zfunc/_electron-bundler\n\n\
                  Generate fish completions:\n    electron-bundler completions fish > ~/.config/fish/completions/electron-bundler.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: Shell,
}
