//! Legacy XGBoost binary dump format.
//!
//! Grounded on `vote_xgboost_load` in `original_source/lib/vote_xgboost.c`.
//! The format is a sequence of fixed-size C structs with no alignment
//! padding beyond what each struct declares; `byteorder` reads every field
//! in little-endian order (the only order the original dumper ever wrote).

use std::io::{Cursor, Read};

use byteorder::{ReadBytesExt, LE};

use vote_core::ensemble::PostProcess;
use vote_core::{Ensemble, Real, Tree};

use crate::error::{IoError, IoResult};

const HEADER_MAGIC: &[u8; 4] = b"binf";

/// `LearnerModelParam`: 4 leading scalar fields plus a 29-`int` reserved
/// block, 140 bytes total on the wire.
struct LearnerModelParam {
    base_score: f32,
    num_feature: u32,
    num_class: i32,
}

fn read_learner_model_param<R: Read>(r: &mut R) -> IoResult<LearnerModelParam> {
    let base_score = r.read_f32::<LE>()?;
    let num_feature = r.read_u32::<LE>()?;
    let num_class = r.read_i32::<LE>()?;
    let _contain_extra_attrs = r.read_i32::<LE>()?;
    let _contain_eval_metrics = r.read_i32::<LE>()?;
    for _ in 0..29 {
        r.read_i32::<LE>()?;
    }
    Ok(LearnerModelParam {
        base_score,
        num_feature,
        num_class,
    })
}

/// `GBTreeModelParam`.
struct GbTreeModelParam {
    num_trees: i32,
    num_feature: i32,
}

fn read_gbtree_model_param<R: Read>(r: &mut R) -> IoResult<GbTreeModelParam> {
    let num_trees = r.read_i32::<LE>()?;
    let _num_roots = r.read_i32::<LE>()?;
    let num_feature = r.read_i32::<LE>()?;
    let _pad_32bit = r.read_i32::<LE>()?;
    let _num_pbuffer_deprecated = r.read_i64::<LE>()?;
    let _num_output_group = r.read_i32::<LE>()?;
    let _size_leaf_vector = r.read_i32::<LE>()?;
    for _ in 0..32 {
        r.read_i32::<LE>()?;
    }
    Ok(GbTreeModelParam {
        num_trees,
        num_feature,
    })
}

/// `TreeParam`.
struct TreeParam {
    num_nodes: i32,
}

fn read_tree_param<R: Read>(r: &mut R) -> IoResult<TreeParam> {
    let _num_roots = r.read_i32::<LE>()?;
    let num_nodes = r.read_i32::<LE>()?;
    let _num_deleted = r.read_i32::<LE>()?;
    let _max_depth = r.read_i32::<LE>()?;
    let _num_feature = r.read_i32::<LE>()?;
    let _size_leaf_vector = r.read_i32::<LE>()?;
    for _ in 0..31 {
        r.read_i32::<LE>()?;
    }
    Ok(TreeParam { num_nodes })
}

/// `Node`.
struct XgNode {
    cleft: i32,
    cright: i32,
    sindex: u32,
    value: f32,
}

fn read_node<R: Read>(r: &mut R) -> IoResult<XgNode> {
    let _parent = r.read_i32::<LE>()?;
    let cleft = r.read_i32::<LE>()?;
    let cright = r.read_i32::<LE>()?;
    let sindex = r.read_u32::<LE>()?;
    let value = r.read_f32::<LE>()?;
    Ok(XgNode {
        cleft,
        cright,
        sindex,
        value,
    })
}

/// `RTreeNodeStat`: read and discarded, it carries training-time
/// statistics that this verifier has no use for.
fn skip_node_stat<R: Read>(r: &mut R) -> IoResult<()> {
    let mut buf = [0u8; 16];
    r.read_exact(&mut buf)?;
    Ok(())
}

fn read_length_prefixed_string<R: Read>(r: &mut R) -> IoResult<String> {
    let len = r.read_u64::<LE>()?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| IoError::Binary(format!("non-utf8 string field: {e}")))
}

fn dispatch_objective(objective: &str, num_class: i32) -> IoResult<(usize, PostProcess)> {
    if objective.contains("reg:") {
        Ok((1, PostProcess::None))
    } else if objective.contains("binary:logistic") {
        Ok((1, PostProcess::Sigmoid))
    } else if objective.contains("multi:softprob") || objective.contains("multi:softmax") {
        if num_class <= 0 {
            return Err(IoError::Binary(format!(
                "objective {objective:?} requires a positive num_class, got {num_class}"
            )));
        }
        Ok((num_class as usize, PostProcess::Softmax))
    } else {
        Err(IoError::UnsupportedObjective(objective.to_string()))
    }
}

fn load<R: Read>(r: &mut R) -> IoResult<Ensemble> {
    let mut header = [0u8; 4];
    r.read_exact(&mut header)?;

    let mut rest: Box<dyn Read + '_>;
    if &header == HEADER_MAGIC {
        rest = Box::new(r);
    } else {
        // No "binf" magic: this dump has no header, so the four bytes we
        // just consumed are the start of `LearnerModelParam`. There is no
        // `rewind` on a generic `Read`, so splice them back on as a prefix.
        rest = Box::new(Cursor::new(header).chain(r));
    }

    let learn_param = read_learner_model_param(&mut rest)?;
    let objective = read_length_prefixed_string(&mut rest)?;
    let _booster = read_length_prefixed_string(&mut rest)?;
    let model_param = read_gbtree_model_param(&mut rest)?;

    let (nb_outputs, post_process) = dispatch_objective(&objective, learn_param.num_class)?;

    if learn_param.num_feature != model_param.num_feature as u32 {
        return Err(IoError::Binary(format!(
            "feature count mismatch: learner={}, model={}",
            learn_param.num_feature, model_param.num_feature
        )));
    }
    let nb_inputs = model_param.num_feature as usize;

    let mut trees = Vec::with_capacity(model_param.num_trees.max(0) as usize);
    for tree_index in 0..model_param.num_trees {
        let tree_param = read_tree_param(&mut rest)?;
        let n_nodes = tree_param.num_nodes as usize;

        let mut left = Vec::with_capacity(n_nodes);
        let mut right = Vec::with_capacity(n_nodes);
        let mut feature = Vec::with_capacity(n_nodes);
        let mut threshold = Vec::with_capacity(n_nodes);
        let mut value = Vec::with_capacity(n_nodes);

        for node_index in 0..n_nodes {
            let node = read_node(&mut rest)?;
            left.push(node.cleft as i64);
            right.push(node.cright as i64);

            let mut row = vec![0.0 as Real; nb_outputs];
            if node.cleft == -1 {
                feature.push(-1);
                threshold.push(0.0);
                match nb_outputs {
                    1 => row[0] = node.value as Real,
                    n => row[(tree_index as usize) % n] = node.value as Real,
                }
            } else {
                feature.push((node.sindex & 0x7FFF_FFFF) as i64);
                threshold.push(node.value as Real);
                let _ = node_index;
            }
            value.push(row);
        }

        for _ in 0..n_nodes {
            skip_node_stat(&mut rest)?;
        }

        let tree = Tree::from_parts(nb_inputs, nb_outputs, left, right, feature, threshold, value, false)?;
        trees.push(tree);
    }

    Ensemble::new(trees, post_process).map_err(IoError::from)
}

/// Load an ensemble from a legacy XGBoost binary dump file.
pub fn load_file(path: &std::path::Path) -> IoResult<Ensemble> {
    let mut f = std::fs::File::open(path)?;
    load(&mut f)
}

/// Load an ensemble from an in-memory legacy XGBoost binary dump.
pub fn load_blob(data: &[u8]) -> IoResult<Ensemble> {
    let mut c = Cursor::new(data);
    load(&mut c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    fn write_learner_model_param<W: Write>(w: &mut W, num_class: i32) {
        w.write_f32::<LE>(0.5).unwrap();
        w.write_u32::<LE>(1).unwrap();
        w.write_i32::<LE>(num_class).unwrap();
        w.write_i32::<LE>(0).unwrap();
        w.write_i32::<LE>(0).unwrap();
        for _ in 0..29 {
            w.write_i32::<LE>(0).unwrap();
        }
    }

    fn write_gbtree_model_param<W: Write>(w: &mut W, num_trees: i32) {
        w.write_i32::<LE>(num_trees).unwrap();
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(0).unwrap();
        w.write_i64::<LE>(0).unwrap();
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(0).unwrap();
        for _ in 0..32 {
            w.write_i32::<LE>(0).unwrap();
        }
    }

    fn write_tree_param<W: Write>(w: &mut W, num_nodes: i32) {
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(num_nodes).unwrap();
        w.write_i32::<LE>(0).unwrap();
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(1).unwrap();
        w.write_i32::<LE>(0).unwrap();
        for _ in 0..31 {
            w.write_i32::<LE>(0).unwrap();
        }
    }

    fn write_node<W: Write>(w: &mut W, cleft: i32, cright: i32, sindex: u32, value: f32) {
        w.write_i32::<LE>(-1).unwrap();
        w.write_i32::<LE>(cleft).unwrap();
        w.write_i32::<LE>(cright).unwrap();
        w.write_u32::<LE>(sindex).unwrap();
        w.write_f32::<LE>(value).unwrap();
    }

    fn write_length_prefixed<W: Write>(w: &mut W, s: &str) {
        w.write_u64::<LE>(s.len() as u64).unwrap();
        w.write_all(s.as_bytes()).unwrap();
    }

    fn write_node_stat<W: Write>(w: &mut W) {
        w.write_all(&[0u8; 16]).unwrap();
    }

    fn build_regression_stump() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(HEADER_MAGIC);
        write_learner_model_param(&mut buf, 0);
        write_length_prefixed(&mut buf, "reg:squarederror");
        write_length_prefixed(&mut buf, "gbtree");
        write_gbtree_model_param(&mut buf, 1);

        write_tree_param(&mut buf, 3);
        write_node(&mut buf, 1, 2, 0, 0.5);
        write_node(&mut buf, -1, -1, 0, 0.0);
        write_node(&mut buf, -1, -1, 0, 1.0);
        for _ in 0..3 {
            write_node_stat(&mut buf);
        }

        buf
    }

    #[test]
    fn loads_a_headered_regression_stump() {
        let bytes = build_regression_stump();
        let e = load_blob(&bytes).unwrap();
        assert_eq!(e.tree_count(), 1);
        assert_eq!(e.n_in(), 1);
        assert_eq!(e.n_out(), 1);
        assert_eq!(e.post_process(), PostProcess::None);
        assert_eq!(e.trees()[0].leaf_value(1), vec![0.0]);
        assert_eq!(e.trees()[0].leaf_value(2), vec![1.0]);
    }

    #[test]
    fn loads_when_the_header_magic_is_absent() {
        let bytes = build_regression_stump();
        let headerless = &bytes[4..];
        let e = load_blob(headerless).unwrap();
        assert_eq!(e.tree_count(), 1);
    }

    #[test]
    fn binary_logistic_selects_sigmoid_with_one_output() {
        let mut buf = Vec::new();
        buf.extend_from_slice(HEADER_MAGIC);
        write_learner_model_param(&mut buf, 0);
        write_length_prefixed(&mut buf, "binary:logistic");
        write_length_prefixed(&mut buf, "gbtree");
        write_gbtree_model_param(&mut buf, 1);
        write_tree_param(&mut buf, 1);
        write_node(&mut buf, -1, -1, 0, 0.25);
        write_node_stat(&mut buf);

        let e = load_blob(&buf).unwrap();
        assert_eq!(e.post_process(), PostProcess::Sigmoid);
        assert_eq!(e.n_out(), 1);
    }

    #[test]
    fn multiclass_softprob_round_robins_leaf_slots_across_trees() {
        let mut buf = Vec::new();
        buf.extend_from_slice(HEADER_MAGIC);
        write_learner_model_param(&mut buf, 3);
        write_length_prefixed(&mut buf, "multi:softprob");
        write_length_prefixed(&mut buf, "gbtree");
        write_gbtree_model_param(&mut buf, 2);

        write_tree_param(&mut buf, 1);
        write_node(&mut buf, -1, -1, 0, 2.0);
        write_node_stat(&mut buf);

        write_tree_param(&mut buf, 1);
        write_node(&mut buf, -1, -1, 0, 3.0);
        write_node_stat(&mut buf);

        let e = load_blob(&buf).unwrap();
        assert_eq!(e.n_out(), 3);
        assert_eq!(e.trees()[0].leaf_value(0), vec![2.0, 0.0, 0.0]);
        assert_eq!(e.trees()[1].leaf_value(0), vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn rejects_unknown_objective() {
        let mut buf = Vec::new();
        buf.extend_from_slice(HEADER_MAGIC);
        write_learner_model_param(&mut buf, 0);
        write_length_prefixed(&mut buf, "rank:pairwise");
        write_length_prefixed(&mut buf, "gbtree");
        write_gbtree_model_param(&mut buf, 0);

        let err = load_blob(&buf).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedObjective(_)));
    }
}
