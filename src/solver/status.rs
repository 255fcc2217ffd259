//! Solver status codes.

/// Status a solver reports with its solution.
///
/// Numeric codes follow the order of the variants, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// Model loaded, no solve performed yet.
    Loaded,
    Optimal,
    Infeasible,
    /// Infeasible or unbounded; the solver could not tell which.
    InfOrUnbd,
    Unbounded,
    /// Optimal objective is worse than the cutoff.
    Cutoff,
    IterationLimit,
    NodeLimit,
    TimeLimit,
    SolutionLimit,
    Interrupted,
    /// Numerical difficulties.
    Numeric,
    Suboptimal,
    /// Asynchronous solve still running.
    InProgress,
    UserObjLimit,
    WorkLimit,
}

const ALL: [SolutionStatus; 16] = [
    SolutionStatus::Loaded,
    SolutionStatus::Optimal,
    SolutionStatus::Infeasible,
    SolutionStatus::InfOrUnbd,
    SolutionStatus::Unbounded,
    SolutionStatus::Cutoff,
    SolutionStatus::IterationLimit,
    SolutionStatus::NodeLimit,
    SolutionStatus::TimeLimit,
    SolutionStatus::SolutionLimit,
    SolutionStatus::Interrupted,
    SolutionStatus::Numeric,
    SolutionStatus::Suboptimal,
    SolutionStatus::InProgress,
    SolutionStatus::UserObjLimit,
    SolutionStatus::WorkLimit,
];

impl SolutionStatus {
    /// Numeric code, 1 through 16.
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_code(code: u8) -> Option<Self> {
        code.checked_sub(1).and_then(|i| ALL.get(i as usize)).copied()
    }

    /// Check if the status indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }

    /// Check if the solver may hold a feasible point (optimal, suboptimal or
    /// stopped at a limit).
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            SolutionStatus::Optimal
                | SolutionStatus::Suboptimal
                | SolutionStatus::IterationLimit
                | SolutionStatus::NodeLimit
                | SolutionStatus::TimeLimit
                | SolutionStatus::SolutionLimit
                | SolutionStatus::Interrupted
                | SolutionStatus::UserObjLimit
                | SolutionStatus::WorkLimit
        )
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Loaded => "LOADED",
            SolutionStatus::Optimal => "OPTIMAL",
            SolutionStatus::Infeasible => "INFEASIBLE",
            SolutionStatus::InfOrUnbd => "INF_OR_UNBD",
            SolutionStatus::Unbounded => "UNBOUNDED",
            SolutionStatus::Cutoff => "CUTOFF",
            SolutionStatus::IterationLimit => "ITERATION_LIMIT",
            SolutionStatus::NodeLimit => "NODE_LIMIT",
            SolutionStatus::TimeLimit => "TIME_LIMIT",
            SolutionStatus::SolutionLimit => "SOLUTION_LIMIT",
            SolutionStatus::Interrupted => "INTERRUPTED",
            SolutionStatus::Numeric => "NUMERIC",
            SolutionStatus::Suboptimal => "SUBOPTIMAL",
            SolutionStatus::InProgress => "INPROGRESS",
            SolutionStatus::UserObjLimit => "USER_OBJ_LIMIT",
            SolutionStatus::WorkLimit => "WORK_LIMIT",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
