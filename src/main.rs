fn main() {
    std::process::exit(cli_tpl::cli::execute(std::env::args_os()));
}
