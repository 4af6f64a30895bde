//! Pathfinding algorithm and animation module.
//!
//! This module contains the two maze solvers (breadth-first search and A*), the record they
//! produce, and the animation state machine that reveals that record cell by cell on screen.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
    fmt,
    time::{Duration, Instant},
};

use crate::maze::{Maze, Position};

/// Default delay between two revealed animation steps, in milliseconds.
///
/// This constant controls the pace of the solving visualization. A lower value results in a faster
/// reveal, while a higher value makes it easier to follow the order in which cells were explored.
pub const DEFAULT_FRAME_DELAY_MS: u64 = 15;

/// Search strategy used to solve a maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    /// Breadth-first search over the passage graph.
    #[default]
    #[value(name = "bfs")]
    Bfs,
    /// A* search guided by the Manhattan distance to the exit.
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    /// Short human-readable name of the algorithm.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::AStar => "A*",
        }
    }

    /// Returns the other algorithm.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Bfs => Self::AStar,
            Self::AStar => Self::Bfs,
        }
    }

    /// Runs this algorithm on the given maze.
    #[must_use]
    pub fn solve(self, maze: &Maze) -> Solution {
        match self {
            Self::Bfs => bfs(maze),
            Self::AStar => astar(maze),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Record of a single solver run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    /// Cells in the order the solver settled them, starting with the entrance.
    pub visited_order: Vec<Position>,
    /// Cells from the entrance to the exit, both included. Empty when the exit is unreachable.
    pub path: Vec<Position>,
}

impl Solution {
    /// Returns whether a path to the exit was found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of moves along the path.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Solves the maze with breadth-first search.
///
/// The search expands cells in first-in first-out order and only moves through knocked-down walls.
/// Since every move costs the same, the first time the exit is dequeued its parent chain is a
/// shortest path.
#[must_use]
pub fn bfs(maze: &Maze) -> Solution {
    let entrance = maze.entrance();
    let exit = maze.exit();

    let mut visited = vec![false; maze.cell_count()];
    let mut parents = vec![None; maze.cell_count()];
    let mut visited_order = Vec::new();

    let _ = mark(maze, &mut visited, entrance);
    let mut queue = VecDeque::from([entrance]);

    while let Some(current) = queue.pop_front() {
        visited_order.push(current);

        if current == exit {
            return Solution {
                path: reconstruct_path(maze, &parents, exit),
                visited_order,
            };
        }

        for next in maze.open_neighbors(current) {
            if mark(maze, &mut visited, next) {
                if let Some(parent) = maze.index(next).and_then(|idx| parents.get_mut(idx)) {
                    *parent = Some(current);
                }
                queue.push_back(next);
            }
        }
    }

    Solution {
        visited_order,
        path: Vec::new(),
    }
}

/// Path cost bookkeeping of a cell discovered by A*.
#[derive(Clone, Copy, Debug)]
struct Scores {
    /// Steps from the entrance.
    cost: usize,
}

/// Entry of the A* open set.
///
/// The derived ordering compares fields top to bottom, which gives the tie-break policy: lowest
/// total estimate first, then lowest remaining distance, then the entry inserted earliest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    /// Steps taken so far plus the remaining distance.
    estimate: usize,
    /// Manhattan distance to the exit.
    remaining: usize,
    /// Insertion counter.
    sequence: usize,
    /// Cell this entry refers to.
    position: Position,
}

/// Solves the maze with A*.
///
/// The heuristic is the Manhattan distance to the exit, which never overestimates on a
/// four-connected grid, so the path found is a shortest one. Entries that were superseded by a
/// cheaper route are skipped lazily when they reach the top of the open set.
#[must_use]
pub fn astar(maze: &Maze) -> Solution {
    let entrance = maze.entrance();
    let exit = maze.exit();

    let mut scores: Vec<Option<Scores>> = vec![None; maze.cell_count()];
    let mut finalized = vec![false; maze.cell_count()];
    let mut parents = vec![None; maze.cell_count()];
    let mut visited_order = Vec::new();
    let mut open = BinaryHeap::new();
    let mut sequence = 0;

    if let Some(score) = maze.index(entrance).and_then(|idx| scores.get_mut(idx)) {
        *score = Some(Scores { cost: 0 });
    }
    let remaining = entrance.manhattan(exit);
    open.push(Reverse(OpenEntry {
        estimate: remaining,
        remaining,
        sequence,
        position: entrance,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.position;
        if !mark(maze, &mut finalized, current) {
            continue;
        }
        visited_order.push(current);

        if current == exit {
            return Solution {
                path: reconstruct_path(maze, &parents, exit),
                visited_order,
            };
        }

        let Some(current_cost) = maze
            .index(current)
            .and_then(|idx| scores.get(idx).copied().flatten())
            .map(|score| score.cost)
        else {
            continue;
        };

        for next in maze.open_neighbors(current) {
            let Some(idx) = maze.index(next) else {
                continue;
            };
            if finalized.get(idx).copied().unwrap_or(true) {
                continue;
            }

            let tentative = current_cost + 1;
            let Some(slot) = scores.get_mut(idx) else {
                continue;
            };
            if slot.is_some_and(|score| score.cost <= tentative) {
                continue;
            }

            *slot = Some(Scores { cost: tentative });
            if let Some(parent) = parents.get_mut(idx) {
                *parent = Some(current);
            }

            sequence += 1;
            let remaining = next.manhattan(exit);
            open.push(Reverse(OpenEntry {
                estimate: tentative + remaining,
                remaining,
                sequence,
                position: next,
            }));
        }
    }

    Solution {
        visited_order,
        path: Vec::new(),
    }
}

/// Sets the flag of a cell, returning `true` if it was previously unset.
fn mark(maze: &Maze, flags: &mut [bool], position: Position) -> bool {
    match maze.index(position).and_then(|idx| flags.get_mut(idx)) {
        Some(flag) if !*flag => {
            *flag = true;
            true
        }
        _ => false,
    }
}

/// Follows parent links back from `target` and returns the path in forward order.
fn reconstruct_path(maze: &Maze, parents: &[Option<Position>], target: Position) -> Vec<Position> {
    let mut path = vec![target];
    let mut current = target;

    while let Some(parent) = maze
        .index(current)
        .and_then(|idx| parents.get(idx).copied().flatten())
    {
        path.push(parent);
        current = parent;
    }

    path.reverse();
    path
}

/// Handle tying an animation to the engine state it was started from.
///
/// The engine issues a new token every time it mutates the maze or its path state. An animation
/// holding an older token refuses to reveal anything further.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    /// Returns the token issued after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Animation step types for solving visualization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStep {
    /// Show a cell the solver explored.
    Visit(Position),
    /// Show a cell of the final path.
    Path(Position),
}

/// Lifecycle of an [`Animation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Nothing to show.
    #[default]
    Idle,
    /// Steps remain to be revealed.
    Running,
    /// Every step has been revealed and stays on screen.
    Finished,
}

/// Animation state manager for solving visualization.
///
/// This structure holds the step list recorded from a [`Solution`] and reveals it one step per
/// frame delay: first the explored cells in visiting order, then the final path.
#[derive(Clone, Debug)]
pub struct Animation {
    /// Steps recorded from the solver output.
    steps: Vec<AnimationStep>,
    /// Index of the next step to reveal.
    next_step: usize,
    /// Minimum time between two revealed steps.
    frame_delay: Duration,
    /// Time at which steps were last revealed.
    last_update_time: Instant,
    /// Token the animation was started under.
    token: AnimationToken,
    /// Current lifecycle phase.
    phase: AnimationPhase,
    /// Explored cells revealed so far.
    explored: Vec<Position>,
    /// Path cells revealed so far.
    path: Vec<Position>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_FRAME_DELAY_MS))
    }
}

impl Animation {
    /// Creates an idle animation with the given frame delay.
    #[must_use]
    pub fn new(frame_delay: Duration) -> Self {
        Self {
            steps: Vec::new(),
            next_step: 0,
            frame_delay,
            last_update_time: Instant::now(),
            token: AnimationToken::default(),
            phase: AnimationPhase::Idle,
            explored: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Loads the steps of a solution and starts revealing them under `token`.
    pub fn start(&mut self, token: AnimationToken, solution: &Solution) {
        self.cancel();

        self.steps = solution
            .visited_order
            .iter()
            .copied()
            .map(AnimationStep::Visit)
            .chain(solution.path.iter().copied().map(AnimationStep::Path))
            .collect();
        self.token = token;
        self.phase = if self.steps.is_empty() {
            AnimationPhase::Finished
        } else {
            AnimationPhase::Running
        };
    }

    /// Drops every step and everything revealed so far.
    pub fn cancel(&mut self) {
        self.steps.clear();
        self.explored.clear();
        self.path.clear();
        self.next_step = 0;
        self.phase = AnimationPhase::Idle;
        self.last_update_time = Instant::now();
    }

    /// Reveals exactly one step, regardless of timing.
    ///
    /// Returns `false` when nothing was revealed, either because the animation is not running or
    /// because `token` is not the one it was started under. In the latter case the animation
    /// discards itself.
    pub fn advance(&mut self, token: AnimationToken) -> bool {
        if self.phase != AnimationPhase::Running {
            return false;
        }
        if token != self.token {
            log::debug!("dropping animation started under a stale token");
            self.cancel();
            return false;
        }

        match self.steps.get(self.next_step) {
            Some(AnimationStep::Visit(position)) => self.explored.push(*position),
            Some(AnimationStep::Path(position)) => self.path.push(*position),
            None => {}
        }

        self.next_step += 1;
        if self.next_step >= self.steps.len() {
            self.phase = AnimationPhase::Finished;
        }

        true
    }

    /// Reveals the steps that became due since the last update.
    ///
    /// One step is due per elapsed frame delay, so a slow event loop catches up instead of
    /// slowing the animation down. Returns the number of revealed steps.
    pub fn update(&mut self, token: AnimationToken) -> usize {
        let elapsed = self.last_update_time.elapsed();
        if self.phase != AnimationPhase::Running || elapsed < self.frame_delay {
            return 0;
        }
        self.last_update_time = Instant::now();

        let due = if self.frame_delay.is_zero() {
            usize::MAX
        } else {
            usize::try_from(elapsed.as_nanos() / self.frame_delay.as_nanos()).unwrap_or(usize::MAX)
        };

        (0..due).take_while(|_| self.advance(token)).count()
    }

    /// Reveals every remaining step at once.
    pub fn finish(&mut self, token: AnimationToken) {
        while self.advance(token) {}
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Explored cells revealed so far.
    #[must_use]
    pub fn explored(&self) -> &[Position] {
        &self.explored
    }

    /// Path cells revealed so far.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Number of revealed steps and total number of steps.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.next_step, self.steps.len())
    }

    /// Delay between two revealed steps.
    #[must_use]
    pub const fn frame_delay(&self) -> Duration {
        self.frame_delay
    }
}
