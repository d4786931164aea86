extern crate regtree;

use regtree::input::{load, InputFormat};
use regtree::predict::{run_session, SessionOutcome};
use regtree::regression_tree::RegressionTree;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

// usage: interactive [table.csv | model.dmp]
//
// Answers are read from stdin one integer per line; -1 cancels.
fn main() {
    env_logger::init();

    let file = env::args()
        .nth(1)
        .unwrap_or_else(|| "dataset/servo/servo.csv".to_string());
    let tree = if Path::new(&file).extension().map_or(false, |e| e == "dmp") {
        RegressionTree::load_model(&file).unwrap()
    } else {
        let mut dataset = load(&file, InputFormat::csv_format()).unwrap();
        RegressionTree::fit(&mut dataset)
    };
    print!("{}", tree.rules_text());

    let stdin = io::stdin();
    let stdout = io::stdout();
    loop {
        let outcome = run_session(&tree, stdin.lock(), stdout.lock()).unwrap();
        match outcome {
            SessionOutcome::Predicted(value) => println!("predicted {} = {}", tree.class_name(), value),
            SessionOutcome::Cancelled => break,
        }

        print!("Again? [y/N] ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 || line.trim() != "y" {
            break;
        }
    }
}
