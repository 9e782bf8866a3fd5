#![deny(warnings)]

use crate::forest::ParseForest;
use std::fmt;


/// A single concrete derivation expanded out of a `ParseForest`.
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum Tree<K> {
    // terminal rule key
    Leaf(K),
    // ("S", [Leaf("A"), Node("X", [...])])
    Node(K, Vec<Tree<K>>),
}

impl<K> Tree<K> {
    pub fn key(&self) -> &K {
        match self {
            Tree::Leaf(key) => key,
            Tree::Node(key, _) => key,
        }
    }

    /// Leaf keys from left to right
    pub fn leaves(&self) -> Vec<&K> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(tree) = pending.pop() {
            match tree {
                Tree::Leaf(key) => leaves.push(key),
                Tree::Node(_, children) => pending.extend(children.iter().rev()),
            }
        }
        leaves
    }

    pub fn depth(&self) -> usize {
        match self {
            Tree::Leaf(_) => 0,
            Tree::Node(_, children) =>
                1 + children.iter().map(Tree::depth).max().unwrap_or(0),
        }
    }
}

impl<K: fmt::Debug> Tree<K> {
    fn print_helper(&self, f: &mut fmt::Formatter, level: &str) -> fmt::Result {
        match self {
            Tree::Leaf(key) => writeln!(f, "{}`-- {:?}", level, key),
            Tree::Node(key, children) => {
                writeln!(f, "{}`-- {:?}", level, key)?;
                if let Some((last, rest)) = children.split_last() {
                    let l = format!("{}  |", level);
                    for n in rest { n.print_helper(f, &l)?; }
                    let l = format!("{}   ", level);
                    last.print_helper(f, &l)?;
                }
                Ok(())
            }
        }
    }
}

impl<K: fmt::Debug> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.print_helper(f, "")
    }
}

impl<K: Clone> ParseForest<K> {
    /// Expand every concrete derivation represented by the forest.
    /// The number of trees can grow exponentially with the input length.
    pub fn trees(&self) -> Vec<Tree<K>> {
        if self.is_leaf() {
            return vec![Tree::Leaf(self.rule().clone())];
        }
        let mut trees = Vec::new();
        for possibility in self.possibilities() {
            // cartesian product over the alternatives of each child
            let mut combinations = vec![Vec::new()];
            for child in possibility.children() {
                let child_trees = child.trees();
                combinations = combinations.into_iter()
                    .flat_map(|prefix: Vec<Tree<K>>| child_trees.iter().map(move |tree| {
                        let mut args = prefix.clone();
                        args.push(tree.clone());
                        args
                    }))
                    .collect();
            }
            trees.extend(combinations.into_iter()
                .map(|children| Tree::Node(self.rule().clone(), children)));
        }
        trees
    }
}


#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::forest::{ParseForest, ParseTree};
    use std::sync::Arc;

    #[test]
    fn expand_ambiguous_forest() {
        let a = Arc::new(ParseForest::leaf("A"));
        let aa = Arc::new(ParseForest::new("S", vec![ParseTree::binary(a.clone(), a.clone())]));
        let s = ParseForest::new("S", vec![
            ParseTree::binary(aa.clone(), a.clone()),
            ParseTree::binary(a.clone(), aa.clone()),
        ]);
        let trees = s.trees();
        assert_eq!(trees, vec![
            Tree::Node("S", vec![
                Tree::Node("S", vec![Tree::Leaf("A"), Tree::Leaf("A")]),
                Tree::Leaf("A")]),
            Tree::Node("S", vec![
                Tree::Leaf("A"),
                Tree::Node("S", vec![Tree::Leaf("A"), Tree::Leaf("A")])]),
        ]);
        for tree in &trees {
            assert_eq!(tree.leaves(), vec![&"A", &"A", &"A"]);
            assert_eq!(tree.depth(), 2);
            assert_eq!(tree.key(), &"S");
        }
    }

    #[test]
    fn print_tree() {
        let tree = Tree::Node("S", vec![
            Tree::Node("X", vec![Tree::Leaf("A"), Tree::Leaf("B")]),
            Tree::Leaf("C"),
        ]);
        let expected = concat!(
            "`-- \"S\"\n",
            "  |`-- \"X\"\n",
            "  |  |`-- \"A\"\n",
            "  |   `-- \"B\"\n",
            "   `-- \"C\"\n",
        );
        assert_eq!(tree.to_string(), expected);
    }
}
