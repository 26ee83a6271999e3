pub(crate) const USAGE_MSG: &str = "usage: smallsh [-hqV] [-p prompt]";

const DESCRIPTOR: &str = "smallsh - run commands in the foreground or background";

const HELP_MSG: &str = "Options:
  -h, --help               display help message and exit
  -p, --prompt=PROMPT      use PROMPT instead of ': '
  -q, --quiet              do not print a prompt
  -V, --version            display version information and exit

Commands are read one per line:
  command [arg ...] [< input_file] [> output_file] [&]

Built-in commands: cd [directory], status, exit
";

pub(crate) fn long_help_message() -> String {
    format!("{USAGE_MSG}\n\n{DESCRIPTOR}\n\n{HELP_MSG}")
}
