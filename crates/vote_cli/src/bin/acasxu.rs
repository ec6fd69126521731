//! Verify one of the ten Reluplex ACAS Xu properties (φ1..φ10) against a
//! tree ensemble trained on the ACAS Xu case study.
//!
//! Grounded on `original_source/examples/acasxu.c`: each property fixes a
//! region of the 5-dimensional input space (ρ, θ, ψ, v_own, v_int) and
//! checks a condition on the 5 advisory outputs (COC, weak-left,
//! weak-right, strong-left, strong-right).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_core::{Bound, Mapping, Outcome, Real};
use vote_pipeline::EnsembleVerify;

const RHO: usize = 0;
const THETA: usize = 1;
const PSI: usize = 2;
const V_OWN: usize = 3;
const V_INT: usize = 4;

const COC: usize = 0;
const WEAK_LEFT: usize = 1;
const STRONG_LEFT: usize = 3;
const STRONG_RIGHT: usize = 4;

const PI: Real = 3.141592;

#[derive(Parser)]
#[command(about = "Verify a tree ensemble trained on the Reluplex ACAS Xu case-study")]
struct Args {
    /// The property to verify (φ)
    #[arg(short = 'p', long)]
    property: u8,
    /// Path to a serialized tree-based model
    model: PathBuf,
}

/// Negates an argmax/argmin check: PASS and FAIL swap, UNSURE is unchanged.
/// Every ACAS Xu property of this shape asks "is class K never the
/// argmax/argmin", the dual of `check_argmax`/`check_argmin`'s "is K
/// always the argmax/argmin".
fn negate(o: Outcome) -> Outcome {
    match o {
        Outcome::Pass => Outcome::Fail,
        Outcome::Fail => Outcome::Pass,
        Outcome::Unsure => Outcome::Unsure,
    }
}

fn check_property_1(m: &mut Mapping) -> Outcome {
    let coc = m.outputs[COC];
    if coc.hi <= 1500.0 {
        Outcome::Pass
    } else if coc.lo > 1500.0 {
        Outcome::Fail
    } else {
        Outcome::Unsure
    }
}

fn check_property_2(m: &mut Mapping) -> Outcome {
    negate(m.argmax_check(COC))
}

fn check_property_3(m: &mut Mapping) -> Outcome {
    negate(m.argmin_check(COC))
}

fn check_property_4(m: &mut Mapping) -> Outcome {
    negate(m.argmin_check(COC))
}

fn check_property_5(m: &mut Mapping) -> Outcome {
    m.argmin_check(STRONG_RIGHT)
}

fn check_property_6(m: &mut Mapping) -> Outcome {
    m.argmin_check(COC)
}

fn check_property_7a(m: &mut Mapping) -> Outcome {
    negate(m.argmin_check(STRONG_RIGHT))
}

fn check_property_7b(m: &mut Mapping) -> Outcome {
    negate(m.argmin_check(STRONG_LEFT))
}

fn check_property_8(m: &mut Mapping) -> Outcome {
    let o1 = m.argmin_check(WEAK_LEFT);
    let o2 = m.argmin_check(COC);
    if o1 == Outcome::Pass || o2 == Outcome::Pass {
        Outcome::Pass
    } else if o1 == Outcome::Fail || o2 == Outcome::Fail {
        Outcome::Fail
    } else {
        Outcome::Unsure
    }
}

fn check_property_9(m: &mut Mapping) -> Outcome {
    m.argmin_check(STRONG_LEFT)
}

fn check_property_10(m: &mut Mapping) -> Outcome {
    m.argmin_check(COC)
}

fn analyze(ensemble: &vote_core::Ensemble, property: u8) -> CliResult<bool> {
    let mut domain = unbounded_domain(ensemble.n_in());

    match property {
        1 => {
            domain[RHO].lo = 55947.691;
            domain[V_OWN].lo = 1145.0;
            domain[V_INT].hi = 60.0;
            Ok(ensemble.absref(&domain, check_property_1)?)
        }
        2 => {
            domain[RHO].lo = 55947.691;
            domain[V_OWN].lo = 1145.0;
            domain[V_INT].hi = 60.0;
            Ok(ensemble.absref(&domain, check_property_2)?)
        }
        3 => {
            domain[RHO] = Bound::new(1500.0, 1800.0);
            domain[THETA] = Bound::new(-0.06, 0.06);
            domain[PSI].lo = 3.1;
            domain[V_OWN].lo = 1980.0;
            domain[V_INT].lo = 960.0;
            Ok(ensemble.absref(&domain, check_property_3)?)
        }
        4 => {
            domain[RHO] = Bound::new(1500.0, 1800.0);
            domain[THETA] = Bound::new(-0.06, 0.06);
            domain[PSI] = Bound::point(0.0);
            domain[V_OWN].lo = 1000.0;
            domain[V_INT] = Bound::new(700.0, 800.0);
            Ok(ensemble.absref(&domain, check_property_4)?)
        }
        5 => {
            domain[RHO] = Bound::new(250.0, 400.0);
            domain[THETA] = Bound::new(0.2, 0.4);
            domain[PSI] = Bound::new(-PI, -PI + 0.005);
            domain[V_OWN] = Bound::new(100.0, 400.0);
            domain[V_INT] = Bound::new(0.0, 400.0);
            Ok(ensemble.absref(&domain, check_property_5)?)
        }
        6 => {
            domain[RHO] = Bound::new(12000.0, 62000.0);
            domain[THETA] = Bound::new(0.7, PI);
            domain[PSI] = Bound::new(-PI, -PI + 0.005);
            domain[V_OWN] = Bound::new(100.0, 1200.0);
            domain[V_INT] = Bound::new(0.0, 1200.0);
            if !ensemble.absref(&domain, check_property_6)? {
                return Ok(false);
            }
            domain[THETA] = Bound::new(-PI, -0.7);
            Ok(ensemble.absref(&domain, check_property_6)?)
        }
        7 => {
            domain[RHO] = Bound::new(0.0, 60760.0);
            domain[THETA] = Bound::new(-PI, PI);
            domain[PSI] = Bound::new(-PI, PI);
            domain[V_OWN] = Bound::new(100.0, 1200.0);
            domain[V_INT] = Bound::new(0.0, 1200.0);
            Ok(ensemble.absref(&domain, check_property_7a)?
                && ensemble.absref(&domain, check_property_7b)?)
        }
        8 => {
            domain[RHO] = Bound::new(0.0, 60760.0);
            domain[THETA] = Bound::new(-PI, -0.75 * PI);
            domain[PSI] = Bound::new(-0.1, 0.1);
            domain[V_OWN] = Bound::new(600.0, 1200.0);
            domain[V_INT] = Bound::new(600.0, 1200.0);
            Ok(ensemble.absref(&domain, check_property_8)?)
        }
        9 => {
            domain[RHO] = Bound::new(2000.0, 7000.0);
            domain[THETA] = Bound::new(-0.4, -0.14);
            domain[PSI] = Bound::new(-PI, -PI + 0.01);
            domain[V_OWN] = Bound::new(100.0, 150.0);
            domain[V_INT] = Bound::new(0.0, 150.0);
            Ok(ensemble.absref(&domain, check_property_9)?)
        }
        10 => {
            domain[RHO] = Bound::new(36000.0, 60760.0);
            domain[THETA] = Bound::new(0.7, PI);
            domain[PSI] = Bound::new(-PI, -PI + 0.01);
            domain[V_OWN] = Bound::new(900.0, 1200.0);
            domain[V_INT] = Bound::new(600.0, 1200.0);
            Ok(ensemble.absref(&domain, check_property_10)?)
        }
        other => Err(vote_cli::CliError::Usage(format!(
            "unknown property (φ={other})"
        ))),
    }
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let passed = analyze(&ensemble, args.property)?;
    Ok(vote_cli::exit_on(passed))
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("acasxu", err),
    }
}
