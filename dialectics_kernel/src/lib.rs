/*!
A library for simulating debates under the Theory of Dialectical Structures
(TDS): propositions, arguments, debates, and the positions debaters hold
towards them.

dialectics_kernel is organised around a handful of core structures and the
services that operate over them:
- A [debate] is the conjunction of a set of [argument]s, each a premise-set
  implying a conclusion; propositions are drawn from a shared
  [proposition] pool.
- A [position] is a partial true/false/suspended assignment over a debate's
  propositions, with coherence, closedness, and distance operations defined
  over it; the [position::sccp] module computes the space of its coherent
  complete extensions.
- The [formula] module compiles a debate to a Boolean formula and exposes
  the four-operation model service ([formula::ModelService]) every other
  module is built on; [formula::ExhaustiveBackend] is the backtracking
  implementation shipped with this crate.
- [introduction] proposes new arguments under an argumentation [strategy];
  [revision] repairs a position that has fallen out of step with a debate;
  [map] derives the support/attack graph of a debate's arguments;
  [mapgen] pre-builds a tree-shaped debate for the fixed-debate simulation
  flavour.
- [simulation] sequences these into a run, producing a [trace::Trace].

Useful starting points:
- [simulation::Simulation] for the default growth-driven run.
- [config] for the records a caller assembles to configure one.
- [error::KernelError] for the failure taxonomy every fallible operation in
  this crate returns.
*/

pub mod argument;
pub mod config;
pub mod debate;
pub mod error;
pub mod formula;
pub mod introduction;
pub mod map;
pub mod mapgen;
pub mod position;
pub mod proposition;
pub mod random;
pub mod revision;
pub mod simulation;
pub mod strategy;
pub mod trace;
