//! Native JSON ensemble format (§6).
//!
//! Root object: `{"post_process": "none"|"divisor"|"softmax"|"sigmoid",
//! "trees": [...]}`. Each tree: `nb_inputs`, `nb_outputs`, `normalize`
//! (optional, default `false`), `left`/`right`/`feature` (integer arrays),
//! `threshold` (number array), `value` (array of per-node output vectors).
//!
//! Grounded on `vote_tree_parse`/`vote_ensemble_load` in
//! `original_source/lib/vote_tree.c` and `vote_ensemble.c`; the DTOs below
//! exist because the wire field names (`nb_inputs`, ...) differ from
//! `vote_core::Tree`'s internal naming, so a direct `#[derive(Deserialize)]`
//! on the domain type isn't an option.

use serde::{Deserialize, Serialize};

use vote_core::ensemble::PostProcess;
use vote_core::{Ensemble, Tree};

use crate::error::{IoError, IoResult};

#[derive(Deserialize, Serialize)]
struct JsonTree {
    nb_inputs: usize,
    nb_outputs: usize,
    #[serde(default)]
    normalize: bool,
    left: Vec<i64>,
    right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

#[derive(Deserialize, Serialize)]
struct JsonEnsemble {
    post_process: String,
    trees: Vec<JsonTree>,
}

fn convert_tree(t: JsonTree) -> IoResult<Tree> {
    let threshold = t.threshold.iter().map(|&x| x as vote_core::Real).collect();
    let value = t
        .value
        .into_iter()
        .map(|row| row.into_iter().map(|x| x as vote_core::Real).collect())
        .collect();

    Tree::from_parts(
        t.nb_inputs,
        t.nb_outputs,
        t.left,
        t.right,
        t.feature,
        threshold,
        value,
        t.normalize,
    )
    .map_err(IoError::from)
}

fn convert(e: JsonEnsemble) -> IoResult<Ensemble> {
    let post_process = PostProcess::parse(&e.post_process)?;
    let trees = e
        .trees
        .into_iter()
        .map(convert_tree)
        .collect::<IoResult<Vec<_>>>()?;
    Ensemble::new(trees, post_process).map_err(IoError::from)
}

/// Parse an ensemble from an already-read JSON string.
pub fn load_str(text: &str) -> IoResult<Ensemble> {
    let parsed: JsonEnsemble = serde_json::from_str(text)?;
    convert(parsed)
}

/// Load an ensemble from a JSON file on disk.
pub fn load_file(path: &std::path::Path) -> IoResult<Ensemble> {
    let text = std::fs::read_to_string(path)?;
    load_str(&text)
}

fn tree_to_wire(t: &Tree) -> JsonTree {
    let n_nodes = t.n_nodes();
    let mut left = Vec::with_capacity(n_nodes);
    let mut right = Vec::with_capacity(n_nodes);
    let mut feature = Vec::with_capacity(n_nodes);
    let mut threshold = Vec::with_capacity(n_nodes);
    let mut value = Vec::with_capacity(n_nodes);

    for node in 0..n_nodes {
        left.push(t.raw_left(node));
        right.push(t.raw_right(node));
        feature.push(t.raw_feature(node));
        threshold.push(t.threshold(node) as f64);
        value.push(t.raw_value(node).iter().map(|&x| x as f64).collect());
    }

    JsonTree {
        nb_inputs: t.n_in(),
        nb_outputs: t.n_out(),
        normalize: t.normalize(),
        left,
        right,
        feature,
        threshold,
        value,
    }
}

/// Serialize an ensemble to the native JSON wire format.
pub fn save_str(e: &Ensemble) -> IoResult<String> {
    let wire = JsonEnsemble {
        post_process: e.post_process().as_str().to_string(),
        trees: e.trees().iter().map(tree_to_wire).collect(),
    };
    serde_json::to_string_pretty(&wire).map_err(IoError::from)
}

/// Write an ensemble to a JSON file on disk, in the native format.
pub fn save_file(e: &Ensemble, path: &std::path::Path) -> IoResult<()> {
    let text = save_str(e)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUMP: &str = r#"{
        "post_process": "none",
        "trees": [
            {
                "nb_inputs": 1,
                "nb_outputs": 1,
                "left": [1, -1, -1],
                "right": [2, -1, -1],
                "feature": [0, -1, -1],
                "threshold": [0.5, 0.0, 0.0],
                "value": [[0.0], [0.0], [1.0]]
            }
        ]
    }"#;

    #[test]
    fn loads_a_single_stump_tree() {
        let e = load_str(STUMP).unwrap();
        assert_eq!(e.tree_count(), 1);
        assert_eq!(e.n_in(), 1);
        assert_eq!(e.n_out(), 1);
        assert_eq!(e.post_process(), PostProcess::None);
    }

    #[test]
    fn rejects_unknown_post_process_tag() {
        let bad = STUMP.replace("\"none\"", "\"bogus\"");
        let err = load_str(&bad).unwrap_err();
        assert!(matches!(err, IoError::Model(_)));
    }

    #[test]
    fn normalize_defaults_to_false() {
        let e = load_str(STUMP).unwrap();
        assert!(!e.trees()[0].normalize());
    }

    #[test]
    fn save_then_load_round_trips_an_ensemble() {
        let e = load_str(STUMP).unwrap();
        let text = save_str(&e).unwrap();
        let reloaded = load_str(&text).unwrap();

        assert_eq!(reloaded.tree_count(), e.tree_count());
        assert_eq!(reloaded.n_in(), e.n_in());
        assert_eq!(reloaded.n_out(), e.n_out());
        assert_eq!(reloaded.post_process(), e.post_process());
        assert_eq!(reloaded.trees()[0].n_nodes(), e.trees()[0].n_nodes());
        assert_eq!(
            reloaded.trees()[0].leaf_value(1),
            e.trees()[0].leaf_value(1)
        );
    }
}
