#[derive(Debug, PartialEq)]
pub struct ShellOptions {
    pub prompt: String,
    pub quiet: bool,
    pub action: ShellAction,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            prompt: ShellOptions::DEFAULT_PROMPT.to_string(),
            quiet: false,
            action: ShellAction::Run,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ShellAction {
    Help,
    Version,
    Run,
}

type OptionSetter = fn(&mut ShellOptions, Option<String>) -> Result<(), String>;

struct ShellOption {
    short: char,
    long: &'static str,
    takes_argument: bool,
    set: OptionSetter,
}

impl ShellOptions {
    pub const DEFAULT_PROMPT: &'static str = ": ";

    const SHELL_OPTIONS: &'static [ShellOption] = &[
        ShellOption {
            short: 'h',
            long: "help",
            takes_argument: false,
            set: |options, _| {
                options.action = ShellAction::Help;
                Ok(())
            },
        },
        ShellOption {
            short: 'p',
            long: "prompt",
            takes_argument: true,
            set: |options, argument| {
                options.prompt = argument.ok_or("option requires an argument -- 'p'")?;
                Ok(())
            },
        },
        ShellOption {
            short: 'q',
            long: "quiet",
            takes_argument: false,
            set: |options, _| {
                options.quiet = true;
                Ok(())
            },
        },
        ShellOption {
            short: 'V',
            long: "version",
            takes_argument: false,
            set: |options, _| {
                options.action = ShellAction::Version;
                Ok(())
            },
        },
    ];

    pub fn from_env() -> Result<ShellOptions, String> {
        let args = std::env::args().collect();

        Self::parse_arguments(args)
    }

    /// parse smallsh arguments into a ShellOptions struct
    pub fn parse_arguments(arguments: Vec<String>) -> Result<ShellOptions, String> {
        let mut options: ShellOptions = ShellOptions::default();
        let mut arg_iter = arguments.into_iter().skip(1);

        while let Some(arg) = arg_iter.next() {
            // if the argument starts with -- it must be a full length option name
            if let Some(long) = arg.strip_prefix("--") {
                // parse assignments like '--prompt=$ '
                if let Some((key, value)) = long.split_once('=') {
                    let option = Self::find_long(key).ok_or_else(|| unrecognized(&arg))?;
                    // the value is already present, when the option does not take any arguments this results in an error
                    if option.takes_argument {
                        (option.set)(&mut options, Some(value.to_string()))?;
                    } else {
                        return Err(format!("'--{}' does not take any arguments", option.long));
                    }
                } else {
                    let option = Self::find_long(long).ok_or_else(|| unrecognized(&arg))?;
                    // try to parse an argument when the option needs an argument
                    let next_arg = if option.takes_argument {
                        arg_iter.next()
                    } else {
                        None
                    };
                    (option.set)(&mut options, next_arg)?;
                }
            } else if arg.starts_with('-') && arg.len() > 1 {
                // flags can be grouped, so we loop over the characters
                for (n, char) in arg.char_indices().skip(1) {
                    let option = Self::SHELL_OPTIONS
                        .iter()
                        .find(|o| o.short == char)
                        .ok_or_else(|| format!("unrecognized option '{char}'"))?;
                    // try to parse an argument when one is necessary, either the rest of the current flag group or the next argument
                    if option.takes_argument {
                        let rest = arg[(n + char.len_utf8())..].to_string();
                        let next_arg = if rest.is_empty() {
                            arg_iter.next()
                        } else {
                            Some(rest)
                        };
                        (option.set)(&mut options, next_arg)?;
                        // stop looping over flags if the current flag takes an argument
                        break;
                    } else {
                        (option.set)(&mut options, None)?;
                    }
                }
            } else {
                return Err(format!("unexpected argument '{arg}'"));
            }
        }

        Ok(options)
    }

    fn find_long(name: &str) -> Option<&'static ShellOption> {
        Self::SHELL_OPTIONS.iter().find(|o| o.long == name)
    }

    /// The prompt to print before each read, empty when quiet.
    pub fn effective_prompt(&self) -> &str {
        if self.quiet {
            ""
        } else {
            &self.prompt
        }
    }
}

fn unrecognized(arg: &str) -> String {
    format!("unrecognized option '{arg}'")
}
