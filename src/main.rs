use clap::Parser;
use shot::commands::shot::args::Args;
use shot::config::Config;
use shot::prompt::LinePrompter;
use shot::report::Reporter;
use shot::{Options, Outcome};

fn main() {
    let args = Args::parse();
    init_logger(args.debug);

    // 設定ファイルを読み込む
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("shot: {e}");
            std::process::exit(1);
        }
    };

    let options = Options::from_args(args, &config);
    let reporter = Reporter::new(options.color, options.quiet);
    let mut prompter = LinePrompter::stdio();

    let exit_code = match shot::run(&options, &mut prompter, &reporter) {
        Ok(Outcome::DryRun(command)) => {
            println!("{command}");
            0
        }
        Ok(outcome) => {
            log::debug!("finished: {outcome:?}");
            0
        }
        Err(e) => {
            reporter.error(&e.to_string());
            if let Some(detail) = e.detail().filter(|_| options.debug) {
                eprintln!("{detail}");
            }
            1
        }
    };
    std::process::exit(exit_code);
}

/// `RUST_LOG` が未指定なら `--debug` で debug、それ以外は warn を既定にする。
fn init_logger(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
