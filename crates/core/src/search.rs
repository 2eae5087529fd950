//! Heuristic placement search
//!
//! For a freshly spawned piece every `(column, rotation)` pair in range is hard-dropped onto
//! a snapshot of the *decided* board, scored with a weighted linear function and the best
//! pair becomes the piece's goal. The winner is merged into the decided board straight
//! away, so pieces planned later treat it as an obstacle even though it has not landed yet.
//!
//! [`Planner`] owns the decided board. It is driven by [`PlannerMessage`]s in the order the
//! simulation emitted them, so plan requests and line clears interleave consistently
//! whether the planner runs inline or on a worker thread.

use std::ops::Range;

use crate::board::{Board, ClearedRows};
use crate::config::{DistanceMode, HeuristicWeights};
use crate::piece::{Goal, Piece, PieceId};
use crate::types::PieceKind;

/// Best placement found for a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub xpos: u16,
    /// Resting row after the hard drop.
    pub ypos: u16,
    pub rotation: usize,
    pub score: f64,
}

impl Placement {
    pub fn goal(&self) -> Goal {
        Goal {
            xpos: self.xpos,
            rotation: self.rotation,
        }
    }
}

/// A piece waiting for a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub piece_id: PieceId,
    pub kind: PieceKind,
    pub lane: usize,
    /// Spawn column; travel distance is measured from here.
    pub home_x: u16,
    /// Columns owned by the piece's lane.
    pub lane_columns: Range<u16>,
    /// Left-edge columns the search may try.
    pub search_columns: Range<u16>,
}

/// Work for the planner, in simulation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerMessage {
    Plan(PlanRequest),
    /// Landed-board rows that were cleared, in clear order.
    RowsCleared(ClearedRows),
    /// New run: forget every decided placement.
    Reset,
}

/// Goal computed for a piece; `None` means no placement was collision-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalAssignment {
    pub piece_id: PieceId,
    pub lane: usize,
    pub goal: Option<Goal>,
}

/// Left-edge columns to try for a lane, widened by `spill` on each side and clamped to the
/// board.
pub fn search_columns(lane_columns: &Range<u16>, spill: u16, board_width: u16) -> Range<u16> {
    let start = lane_columns.start.saturating_sub(spill);
    let end = lane_columns.end.saturating_add(spill).min(board_width);
    start..end
}

/// Score a board that already contains the candidate placement.
///
/// Completed rows are removed from `board` while scoring.
pub fn score_placement(
    board: &mut Board,
    candidate: &Piece,
    home_x: u16,
    lane_columns: &Range<u16>,
    weights: &HeuristicWeights,
) -> f64 {
    let mut complete_lines = 0u32;
    for y in candidate.row_span() {
        if board.is_row_full(y) {
            board.remove_row(y);
            complete_lines += 1;
        }
    }

    let width = board.width();
    let height = board.height();
    let piece_columns = candidate.xpos..candidate.xpos + candidate.width as u16;
    // One row past the footprint also counts: a hole directly under the piece's bottom
    // edge is one the piece created.
    let touched_rows = candidate.ypos..=candidate.ypos + candidate.height as u16;

    let mut covered_empty = 0u32;
    let mut nearby_empty = 0u32;
    let mut height_sum = 0u32;
    let mut first_height = 0u16;
    let mut prev_height = 0u16;
    let mut variation = 0u32;
    let mut lane_stack = 0u16;

    for x in 0..width {
        let bit = 1 << x;
        let mut empty_run = 0u32;
        let mut column_height = 0u16;
        for (y, row) in board.rows().iter().enumerate().rev() {
            if row & bit == 0 {
                empty_run += 1;
                continue;
            }
            column_height = height - y as u16;
            if empty_run != 0 && piece_columns.contains(&x) {
                nearby_empty += empty_run;
                if touched_rows.contains(&(y as u16)) {
                    covered_empty += 1;
                }
            }
            empty_run = 0;
        }

        height_sum += column_height as u32;
        if x == 0 {
            first_height = column_height;
        } else {
            variation += column_height.abs_diff(prev_height) as u32;
        }
        prev_height = column_height;
        if lane_columns.contains(&x) {
            lane_stack = lane_stack.max(column_height);
        }
    }
    // Wrap around so the outermost columns are compared with each other too.
    variation += first_height.abs_diff(prev_height) as u32;

    let average_height = height_sum as f64 / width as f64;
    let distance = candidate.xpos.abs_diff(home_x);

    let mut score = complete_lines as f64 * weights.complete_lines;
    score += covered_empty as f64 * weights.covered_empty;
    score += nearby_empty as f64 * weights.nearby_empty;
    score += average_height * weights.average_height;
    score += variation as f64 * weights.height_variation;
    match weights.distance_mode {
        DistanceMode::Always => score += distance as f64 * weights.distance,
        DistanceMode::AdjacentOnly if distance <= 1 => {
            score += distance as f64 * weights.distance
        }
        DistanceMode::AdjacentOnly => {}
    }

    if weights.tetris_strategy() && lane_stack < height / 2 {
        if complete_lines == 4 {
            score += weights.tetris_bonus;
        } else {
            score += complete_lines as f64 * weights.early_clear;
            if candidate.xpos == lane_columns.start {
                score += weights.well_column;
            }
        }
    }

    score
}

/// Drop `candidate` from its current row until blocked on `board`.
fn settle(board: &Board, candidate: &mut Piece) {
    while candidate.ypos + (candidate.height as u16) < board.height() {
        candidate.ypos += 1;
        if board.collides(candidate) {
            candidate.ypos -= 1;
            break;
        }
    }
}

/// Evaluate every candidate placement and return the best one.
///
/// Columns are scanned left to right, rotations in table order; ties keep the first
/// maximum. Candidates whose box leaves the board or that collide at the top row are
/// skipped. Returns `None` if nothing fits.
pub fn best_placement(
    decided: &Board,
    request: &PlanRequest,
    weights: &HeuristicWeights,
) -> Option<Placement> {
    let mut candidate = Piece::new(request.piece_id, request.kind, request.lane, 0, 0);
    let mut scratch = decided.clone();
    let mut best: Option<Placement> = None;

    for xpos in request.search_columns.clone() {
        for rotation in 0..candidate.rotation_count() {
            candidate.set_rotation(rotation);
            candidate.xpos = xpos;
            candidate.ypos = 0;
            if xpos + candidate.width as u16 > decided.width() || decided.collides(&candidate) {
                continue;
            }
            settle(decided, &mut candidate);

            scratch.clone_from(decided);
            scratch.merge(&candidate);
            let score = score_placement(
                &mut scratch,
                &candidate,
                request.home_x,
                &request.lane_columns,
                weights,
            );
            if best.map_or(true, |b| score > b.score) {
                best = Some(Placement {
                    xpos,
                    ypos: candidate.ypos,
                    rotation,
                    score,
                });
            }
        }
    }

    best
}

/// Owner of the decided board.
#[derive(Debug, Clone)]
pub struct Planner {
    decided: Board,
    weights: HeuristicWeights,
}

impl Planner {
    pub fn new(width: u16, height: u16, weights: HeuristicWeights) -> Self {
        Self {
            decided: Board::new(width, height),
            weights,
        }
    }

    pub fn decided(&self) -> &Board {
        &self.decided
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Choose a goal and reserve its cells on the decided board.
    pub fn plan(&mut self, request: &PlanRequest) -> Option<Placement> {
        let placement = best_placement(&self.decided, request, &self.weights)?;
        let mut reserved = Piece::new(request.piece_id, request.kind, request.lane, 0, 0);
        reserved.set_rotation(placement.rotation);
        reserved.xpos = placement.xpos;
        reserved.ypos = placement.ypos;
        self.decided.merge(&reserved);
        Some(placement)
    }

    /// Apply one message; plan requests yield an assignment.
    pub fn handle(&mut self, message: PlannerMessage) -> Option<GoalAssignment> {
        match message {
            PlannerMessage::Plan(request) => {
                let goal = self.plan(&request).map(|p| p.goal());
                Some(GoalAssignment {
                    piece_id: request.piece_id,
                    lane: request.lane,
                    goal,
                })
            }
            PlannerMessage::RowsCleared(rows) => {
                for y in rows {
                    self.decided.remove_row(y);
                }
                None
            }
            PlannerMessage::Reset => {
                self.decided.clear();
                None
            }
        }
    }
}
