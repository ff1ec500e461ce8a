use nodepath::{FunctionRegistry, NodepathError, Selector, SimpleNode, compile, describe, json};
use std::env;

/// Prints the nodes of a JSON tree matched by a selector, one per line.
fn main() -> Result<(), NodepathError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Selects nodes from a JSON tree document.");
        eprintln!();
        eprintln!("Usage: {} <selector> <path/to/tree.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} '//item[@price > 10]' catalog.json", args[0]);
        std::process::exit(1);
    }

    let selector_text = &args[1];
    let tree_path = &args[2];

    let tree = json::tree_from_path(tree_path)?;
    let functions = FunctionRegistry::default();
    let selector: Selector<SimpleNode> = compile(selector_text, &functions)?;
    log::info!("Selecting '{}' from {} nodes", selector, tree.len());

    for node in selector.select_all(&tree.root(), &functions)? {
        println!("{}", describe(&node));
    }
    Ok(())
}
