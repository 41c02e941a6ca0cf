//! Batch experiments.
//!
//! A [`BatchDriver`] owns a pool of named runners and a
//! [`TokenRingSolver`]. Runners are moved from the pool into the ring by
//! name, tuned through [`ParameterBox`]es and put back with
//! [`clean_solver`](BatchDriver::clean_solver).
//! [`start_solver`](BatchDriver::start_solver) solves a number of
//! independent trials and writes one line per trial to a log:
//!
//! ```text
//! Run   elapsed time   cost   violations   objective
//! ---------------------------------------------------
//! 1     0.012          3      0            3
//! ...
//! Avg:  0.011          2.5    0            2.5
//! ```
//!
//! With an output prefix, the solution of trial `i` is also written to
//! `{prefix}-{i}.out` by the [`OutputManager`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{LocalSearchError, Result};
use crate::output::OutputManager;
use crate::params::ParameterBox;
use crate::random::SearchRng;
use crate::runner::{Runner, RunnerKind};
use crate::solver::{BoxedRunner, Solver, TokenRingConfig, TokenRingSolver};
use crate::state::StateManager;

const RULE: &str =
    "--------------------------------------------------------------------------";

/// Outcome of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialRecord {
    /// Wall-clock seconds spent in the solver.
    pub elapsed: f64,
    pub cost: f64,
    pub violations: i64,
    pub objective: i64,
}

/// Outcomes of a batch of trials, in trial order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentReport {
    pub trials: Vec<TrialRecord>,
}

impl ExperimentReport {
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    fn mean(&self, field: impl Fn(&TrialRecord) -> f64) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        self.trials.iter().map(field).sum::<f64>() / self.trials.len() as f64
    }

    pub fn average_elapsed(&self) -> f64 {
        self.mean(|t| t.elapsed)
    }

    pub fn average_cost(&self) -> f64 {
        self.mean(|t| t.cost)
    }

    pub fn average_violations(&self) -> f64 {
        self.mean(|t| t.violations as f64)
    }

    pub fn average_objective(&self) -> f64 {
        self.mean(|t| t.objective as f64)
    }

    /// The cheapest trial; the earliest one on ties.
    pub fn best(&self) -> Option<&TrialRecord> {
        self.trials
            .iter()
            .reduce(|best, t| if t.cost < best.cost { t } else { best })
    }
}

/// Runs batches of token-ring solves over a pool of named runners.
///
/// # Examples
///
/// ```
/// use u_localsearch::driver::BatchDriver;
/// use u_localsearch::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
/// use u_localsearch::random::create_rng;
/// use u_localsearch::runner::RunnerKind;
/// use u_localsearch::timetabling::{
///     Course, FacultyBuilder, RoomNeighborhoodExplorer, TtOutputManager, TtStateManager,
/// };
///
/// let faculty = FacultyBuilder::new("demo")
///     .week(2, 2)
///     .room("A", 20)
///     .room("B", 60)
///     .course(Course::new("Optics", "Huygens", 2, 1, 50))
///     .build()
///     .unwrap();
/// let sm = TtStateManager::new(&faculty);
/// let om = TtOutputManager::new(&faculty);
/// let ne = RoomNeighborhoodExplorer::new(&faculty);
///
/// let mut driver = BatchDriver::new(&sm, &om);
/// driver
///     .register_runner(Box::new(HillClimbing::new(
///         "HC",
///         &sm,
///         &ne,
///         HillClimbingPolicy::new(HillClimbingConfig::default().with_max_idle_iteration(50)),
///     )))
///     .unwrap();
/// driver.add_runner_to_solver("HC", RunnerKind::HillClimbing).unwrap();
/// driver.set_trials(3);
///
/// let mut log = Vec::new();
/// let report = driver.start_solver(&mut create_rng(1), &mut log).unwrap();
/// assert_eq!(report.len(), 3);
/// assert_eq!(report.average_cost(), 0.0);
/// ```
pub struct BatchDriver<'a, SM: StateManager, OM> {
    sm: &'a SM,
    om: &'a OM,
    pool: Vec<BoxedRunner<'a, SM>>,
    solver: TokenRingSolver<'a, SM>,
    trials: usize,
    output_prefix: Option<PathBuf>,
}

impl<'a, SM, OM> BatchDriver<'a, SM, OM>
where
    SM: StateManager + 'a,
    OM: OutputManager<State = SM::State>,
{
    pub fn new(sm: &'a SM, om: &'a OM) -> Self {
        Self {
            sm,
            om,
            pool: Vec::new(),
            solver: TokenRingSolver::new(sm, TokenRingConfig::default()),
            trials: 1,
            output_prefix: None,
        }
    }

    /// Adds a runner to the pool.
    ///
    /// # Errors
    ///
    /// [`LocalSearchError::InvalidConfig`] if the name is already taken.
    pub fn register_runner(&mut self, runner: BoxedRunner<'a, SM>) -> Result<()> {
        if self.find_runner(runner.name()).is_some() {
            return Err(LocalSearchError::InvalidConfig(format!(
                "duplicate runner name '{}'",
                runner.name()
            )));
        }
        self.pool.push(runner);
        Ok(())
    }

    /// Names of the runners still in the pool.
    pub fn pool(&self) -> Vec<&str> {
        self.pool.iter().map(|r| r.name()).collect()
    }

    pub fn solver(&self) -> &TokenRingSolver<'a, SM> {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut TokenRingSolver<'a, SM> {
        &mut self.solver
    }

    /// Moves the runner `name` from the pool to the end of the ring.
    ///
    /// # Errors
    ///
    /// [`RunnerNotFound`](LocalSearchError::RunnerNotFound) for an unknown
    /// name, [`RunnerTypeMismatch`](LocalSearchError::RunnerTypeMismatch)
    /// if the runner is not of `kind`, and
    /// [`InvalidConfig`](LocalSearchError::InvalidConfig) if it is already
    /// in the ring.
    pub fn add_runner_to_solver(&mut self, name: &str, kind: RunnerKind) -> Result<()> {
        let Some(pos) = self.pool.iter().position(|r| r.name() == name) else {
            if self.solver.runners().iter().any(|r| r.name() == name) {
                return Err(LocalSearchError::InvalidConfig(format!(
                    "runner '{name}' is already in the solver"
                )));
            }
            return Err(LocalSearchError::RunnerNotFound(name.to_string()));
        };
        check_kind(&*self.pool[pos], kind)?;
        let runner = self.pool.remove(pos);
        debug!(event = "runner_added", runner = name, kind = %kind);
        self.solver.add_runner(runner);
        Ok(())
    }

    /// Returns every runner of the ring to the pool.
    pub fn clean_solver(&mut self) {
        let runners = self.solver.clear_runners();
        self.pool.extend(runners);
    }

    /// Passes `params` to the runner `name`, in the pool or in the ring.
    ///
    /// # Errors
    ///
    /// Lookup errors as in [`add_runner_to_solver`](Self::add_runner_to_solver),
    /// and parameter errors from the runner.
    pub fn set_running_parameters(
        &mut self,
        name: &str,
        kind: RunnerKind,
        params: &ParameterBox,
    ) -> Result<()> {
        let runner = self
            .pool
            .iter_mut()
            .chain(self.solver.runners_mut().iter_mut())
            .find(|r| r.name() == name)
            .ok_or_else(|| LocalSearchError::RunnerNotFound(name.to_string()))?;
        check_kind(&**runner, kind)?;
        runner.set_parameters(params)
    }

    pub fn set_solver_parameters(&mut self, rounds: u32, start_runner: usize) {
        self.solver.set_rounds(rounds);
        self.solver.set_start_runner(start_runner);
    }

    pub fn set_trials(&mut self, trials: usize) {
        self.trials = trials;
    }

    /// Writes the solution of every trial under `{prefix}-{trial}.out`.
    pub fn set_output_prefix(&mut self, prefix: impl Into<PathBuf>) {
        self.output_prefix = Some(prefix.into());
    }

    fn find_runner(&self, name: &str) -> Option<&BoxedRunner<'a, SM>> {
        self.pool
            .iter()
            .chain(self.solver.runners())
            .find(|r| r.name() == name)
    }

    fn output_path(&self, trial: usize) -> Option<PathBuf> {
        self.output_prefix.as_ref().map(|prefix| {
            let mut name = prefix.clone().into_os_string();
            name.push(format!("-{trial}.out"));
            PathBuf::from(name)
        })
    }

    /// Solves `trials` times from fresh initial states.
    ///
    /// Each solution goes through the output manager and back into a
    /// fresh state before it is scored, so the reported figures are those
    /// of the persisted solution.
    pub fn start_solver<W: Write>(
        &mut self,
        rng: &mut SearchRng,
        log: &mut W,
    ) -> Result<ExperimentReport> {
        let mut report = ExperimentReport::default();
        writeln!(log, "Run\telapsed time\tcost \tviolations\tobjective\t")?;
        writeln!(log, "{RULE}")?;

        for trial in 1..=self.trials {
            let start = Instant::now();
            self.solver.solve(rng)?;
            let elapsed = start.elapsed().as_secs_f64();

            let out = self.om.output_state(self.solver.internal_state());
            let mut check = self.sm.empty_state();
            self.om
                .input_state(&mut check, &out)
                .map_err(|e| LocalSearchError::Output(Box::new(e)))?;
            if let Some(path) = self.output_path(trial) {
                let mut w = BufWriter::new(File::create(&path)?);
                self.om
                    .write_output(&out, &mut w)
                    .map_err(|e| LocalSearchError::Output(Box::new(e)))?;
                w.flush()?;
            }

            let record = TrialRecord {
                elapsed,
                cost: self.sm.cost_function(&check),
                violations: self.sm.violations(&check),
                objective: self.sm.objective(&check),
            };
            info!(
                event = "trial_end",
                trial,
                elapsed = record.elapsed,
                cost = record.cost,
                violations = record.violations,
                objective = record.objective,
            );
            writeln!(
                log,
                "{trial}\t{:.3}\t\t{}\t{}\t\t{}",
                record.elapsed, record.cost, record.violations, record.objective
            )?;
            report.trials.push(record);
        }

        writeln!(log, "{RULE}")?;
        writeln!(
            log,
            "Avg:\t{:.3}\t\t{}\t{}\t\t{}",
            report.average_elapsed(),
            report.average_cost(),
            report.average_violations(),
            report.average_objective()
        )?;
        Ok(report)
    }
}

fn check_kind<S>(runner: &dyn Runner<S>, kind: RunnerKind) -> Result<()> {
    if runner.kind() == kind {
        Ok(())
    } else {
        Err(LocalSearchError::RunnerTypeMismatch {
            name: runner.name().to_string(),
            expected: kind.to_string(),
            found: runner.kind().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
    use crate::params::{ParamValue, MAX_IDLE_ITERATION, MAX_ITERATION};
    use crate::random::create_rng;
    use crate::sd::{SteepestDescent, SteepestDescentPolicy};
    use crate::timetabling::{
        Course, FacultyBuilder, RoomNeighborhoodExplorer, TimeNeighborhoodExplorer,
        TtOutputManager, TtStateManager,
    };

    fn faculty() -> crate::timetabling::Faculty {
        FacultyBuilder::new("batch")
            .week(2, 3)
            .room("A", 30)
            .room("B", 90)
            .course(Course::new("Calc", "Gauss", 3, 2, 80))
            .course(Course::new("Alg", "Noether", 2, 2, 25))
            .course(Course::new("Hist", "Bloch", 2, 1, 10))
            .curriculum("Y1", "First year", &["Calc", "Alg"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_runner_lookup_errors() {
        let f = faculty();
        let sm = TtStateManager::new(&f);
        let om = TtOutputManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut driver = BatchDriver::new(&sm, &om);
        driver
            .register_runner(Box::new(SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy)))
            .unwrap();

        assert!(matches!(
            driver.register_runner(Box::new(SteepestDescent::new(
                "SD",
                &sm,
                &ne,
                SteepestDescentPolicy
            ))),
            Err(LocalSearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            driver.add_runner_to_solver("TS", RunnerKind::TabuSearch),
            Err(LocalSearchError::RunnerNotFound(_))
        ));
        assert!(matches!(
            driver.add_runner_to_solver("SD", RunnerKind::HillClimbing),
            Err(LocalSearchError::RunnerTypeMismatch { .. })
        ));
        driver
            .add_runner_to_solver("SD", RunnerKind::SteepestDescent)
            .unwrap();
        assert!(matches!(
            driver.add_runner_to_solver("SD", RunnerKind::SteepestDescent),
            Err(LocalSearchError::InvalidConfig(_))
        ));
        assert!(driver.pool().is_empty());

        driver.clean_solver();
        assert_eq!(driver.pool(), vec!["SD"]);
        assert!(driver.solver().runners().is_empty());
    }

    #[test]
    fn test_set_running_parameters() {
        let f = faculty();
        let sm = TtStateManager::new(&f);
        let om = TtOutputManager::new(&f);
        let ne = TimeNeighborhoodExplorer::new(&f);
        let mut driver = BatchDriver::new(&sm, &om);
        driver
            .register_runner(Box::new(HillClimbing::new(
                "HC",
                &sm,
                &ne,
                HillClimbingPolicy::new(HillClimbingConfig::default()),
            )))
            .unwrap();

        let params = ParameterBox::new()
            .with(MAX_ITERATION, ParamValue::Natural(10))
            .with(MAX_IDLE_ITERATION, ParamValue::Natural(5));
        driver
            .set_running_parameters("HC", RunnerKind::HillClimbing, &params)
            .unwrap();
        assert!(matches!(
            driver.set_running_parameters("HC", RunnerKind::TabuSearch, &params),
            Err(LocalSearchError::RunnerTypeMismatch { .. })
        ));
        assert!(matches!(
            driver.set_running_parameters("SA", RunnerKind::SimulatedAnnealing, &params),
            Err(LocalSearchError::RunnerNotFound(_))
        ));

        // Runners already in the ring are reachable too.
        driver.add_runner_to_solver("HC", RunnerKind::HillClimbing).unwrap();
        driver
            .set_running_parameters("HC", RunnerKind::HillClimbing, &params)
            .unwrap();
        assert_eq!(driver.solver().runners()[0].max_iteration(), 10);
    }

    #[test]
    fn test_start_solver_reports_every_trial() {
        let f = faculty();
        let sm = TtStateManager::new(&f);
        let om = TtOutputManager::new(&f);
        let time = TimeNeighborhoodExplorer::new(&f);
        let room = RoomNeighborhoodExplorer::new(&f);
        let hc = HillClimbingPolicy::new(HillClimbingConfig::default().with_max_idle_iteration(100));
        let mut driver = BatchDriver::new(&sm, &om);
        driver
            .register_runner(Box::new(
                HillClimbing::new("HC time", &sm, &time, hc.clone()).with_max_iteration(1000),
            ))
            .unwrap();
        driver
            .register_runner(Box::new(
                HillClimbing::new("HC room", &sm, &room, hc).with_max_iteration(1000),
            ))
            .unwrap();
        driver.add_runner_to_solver("HC time", RunnerKind::HillClimbing).unwrap();
        driver.add_runner_to_solver("HC room", RunnerKind::HillClimbing).unwrap();
        driver.set_solver_parameters(2, 1);
        driver.set_trials(4);

        let mut log = Vec::new();
        let report = driver.start_solver(&mut create_rng(5), &mut log).unwrap();
        assert_eq!(report.len(), 4);
        for t in &report.trials {
            assert!(t.elapsed >= 0.0);
            assert!((t.cost - (1000.0 * t.violations as f64 + t.objective as f64)).abs() < 1e-9);
        }
        let best = report.best().unwrap();
        assert!(best.cost <= report.average_cost() + 1e-9);

        let text = String::from_utf8(log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 4 + 2);
        assert!(lines[0].starts_with("Run\telapsed time"));
        assert!(lines[2].starts_with("1\t"));
        assert!(lines[7].starts_with("Avg:\t"));
    }

    #[test]
    fn test_output_files_per_trial() {
        let f = faculty();
        let sm = TtStateManager::new(&f);
        let om = TtOutputManager::new(&f);
        let room = RoomNeighborhoodExplorer::new(&f);
        let mut driver = BatchDriver::new(&sm, &om);
        driver
            .register_runner(Box::new(SteepestDescent::new("SD", &sm, &room, SteepestDescentPolicy)))
            .unwrap();
        driver.add_runner_to_solver("SD", RunnerKind::SteepestDescent).unwrap();
        driver.set_trials(2);

        let dir = std::env::temp_dir().join(format!("u-localsearch-driver-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        driver.set_output_prefix(dir.join("run"));
        let report = driver
            .start_solver(&mut create_rng(2), &mut std::io::sink())
            .unwrap();

        for trial in 1..=2 {
            let file = std::fs::File::open(dir.join(format!("run-{trial}.out"))).unwrap();
            let tt = om.read_output(std::io::BufReader::new(file)).unwrap();
            let mut st = sm.empty_state();
            om.input_state(&mut st, &tt).unwrap();
            assert!((sm.cost_function(&st) - report.trials[trial - 1].cost).abs() < 1e-9);
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_report_averages() {
        let report = ExperimentReport::default();
        assert!(report.is_empty());
        assert_eq!(report.average_cost(), 0.0);
        assert!(report.best().is_none());
    }
}
