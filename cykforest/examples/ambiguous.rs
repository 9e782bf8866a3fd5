use cykforest::{CykParser, ForestStats, GrammarBuilder, flatten_temporaries};
use tracing_subscriber::EnvFilter;

fn main() {
    // parser logs go through the `log` facade, picked up by the subscriber
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Grammar:  E -> E + E | E * E | n
    // reduced:  E -> E R;  R -> P E | M E (temporary);  P -> '+';  M -> '*';  E -> 'n'
    let grammar = GrammarBuilder::default()
      .terminal("E", 'n')
      .terminal("P", '+')
      .terminal("M", '*')
      .rule("E", "E", "R")
      .temp_rule("R", "P", "E")
      .temp_rule("R", "M", "E")
      .start("E")
      .into_grammar()
      .unwrap();

    let input = std::env::args().nth(1).unwrap_or_else(|| "n+n*n+n".to_string());
    let parser = CykParser::new(grammar.clone());
    let forests = parser.parse(input.chars()).unwrap();
    if forests.is_empty() {
        println!("no parse for {:?}", input);
        return;
    }

    let stats = ForestStats::of_all(&forests).unwrap();
    println!("{:?}", stats);

    // Print every derivation with the temporary rules spliced out,
    // leaves show the consumed symbols
    for forest in flatten_temporaries(&forests, &grammar).unwrap() {
        for tree in forest.trees() {
            println!("{}", tree);
        }
    }
}
