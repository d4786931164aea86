extern crate regtree;

use regtree::config::Config;
use regtree::fitness::rmse;
use regtree::input::{load, InputFormat};
use regtree::regression_tree::RegressionTree;

use std::env;

// usage: train-and-save [table.csv] [leaf size percentage]
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let train_file = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "dataset/servo/servo.csv".to_string());

    let mut cfg = Config::new();
    if let Some(pct) = args.get(2) {
        cfg.set_leaf_size_percentage(pct.parse().unwrap());
    }
    println!("{}", cfg.to_string());

    let mut dataset = load(&train_file, InputFormat::csv_format()).unwrap();
    let tree = RegressionTree::fit_with_config(&cfg, &mut dataset);

    println!("{}", tree.tree_text());
    println!("{}", tree.rules_text());
    println!(
        "nodes: {}  leaves: {}  depth: {}",
        tree.len(),
        tree.leaf_count(),
        tree.depth()
    );
    println!("training rmse: {:?}", rmse(&tree, &dataset));

    let model_file = format!("{}.dmp", train_file.trim_end_matches(".csv"));
    tree.save_model(&model_file).unwrap();
    println!("model saved to {}", model_file);
}
