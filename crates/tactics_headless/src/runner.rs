//! Headless battle runner implementation.

use std::io::{self, BufRead, Write};

use tactics_core::battle::{Battle, Interaction};
use tactics_core::grid::GridCoord;
use tactics_core::math::{Fixed, Vec2Fixed};

use crate::protocol::{BattleState, Command, RangeCell, Response, PROTOCOL_VERSION};
use crate::scenario::{Scenario, ScenarioError};

/// Headless runner: feeds protocol commands to a battle.
pub struct HeadlessRunner {
    battle: Battle,
    should_quit: bool,
}

impl HeadlessRunner {
    /// Create a runner around an existing battle.
    pub fn new(battle: Battle) -> Self {
        Self {
            battle,
            should_quit: false,
        }
    }

    /// Create a runner for a scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ScenarioError> {
        Ok(Self::new(scenario.build()?))
    }

    /// The battle being driven.
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Whether a `quit` command was processed.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Ready message describing the battle.
    pub fn ready(&self) -> Response {
        Response::Ready {
            version: PROTOCOL_VERSION.to_string(),
            width: self.battle.grid().width(),
            height: self.battle.grid().height(),
            pawns: self.battle.pawn_ids(),
        }
    }

    /// Run the command loop.
    ///
    /// Writes the ready message, then one response per non-empty input
    /// line until `quit` or end of input, then `bye`.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> io::Result<()> {
        tracing::info!("Headless runner ready");
        writer.write_all(self.ready().to_json_line().as_bytes())?;
        writer.flush()?;

        for line in reader.lines() {
            let line = line?;
            let Some(response) = self.handle_line(&line) else {
                continue;
            };
            writer.write_all(response.to_json_line().as_bytes())?;
            writer.flush()?;

            if self.should_quit {
                return Ok(());
            }
        }

        writer.write_all(Response::Bye.to_json_line().as_bytes())?;
        writer.flush()
    }

    /// Parse and process one input line. Blank lines yield nothing.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match Command::from_json(line) {
            Ok(cmd) => Some(self.handle(cmd)),
            Err(e) => {
                tracing::debug!(%line, error = %e, "Unparseable command");
                Some(Response::error(format!("Invalid command: {e}"), None))
            }
        }
    }

    /// Process one command.
    pub fn handle(&mut self, cmd: Command) -> Response {
        let name = cmd.name();
        tracing::debug!(cmd = name, "Processing command");

        match cmd {
            Command::Query => Response::State(self.state()),

            Command::Pointer { x, y } => {
                let (Some(x), Some(y)) = (Fixed::checked_from_num(x), Fixed::checked_from_num(y))
                else {
                    return Response::error("Pointer position out of range", Some(name));
                };
                let cell = self.battle.hover_pointer(Vec2Fixed::new(x, y));
                self.hovered(cell)
            }

            Command::Hover { x, y } => {
                let cell = GridCoord::new(x, y);
                self.battle.hover_cell(Some(cell));
                self.hovered(self.battle.hovered_cell())
            }

            Command::PickCell { x, y } => {
                let outcome = self.battle.on_cell_picked(GridCoord::new(x, y));
                self.interaction(name, outcome)
            }

            Command::PickPawn { pawn_id } => {
                let outcome = self.battle.on_pawn_picked(pawn_id);
                self.interaction(name, outcome)
            }

            Command::SelectAbility { index } => {
                let outcome = self.battle.select_ability(index);
                self.interaction(name, outcome)
            }

            Command::Cancel => {
                let outcome = self.battle.cancel();
                self.interaction(name, outcome)
            }

            Command::StartTurn { pawn_id } => match self.battle.start_turn(pawn_id) {
                Ok(()) => Response::ack(name),
                Err(e) => Response::error(e.to_string(), Some(name)),
            },

            Command::BeginTeamTurn { team } => {
                self.battle.begin_team_turn(team);
                Response::ack(name)
            }

            Command::Snapshot { pawn_id } => match self.battle.pawn_snapshot(pawn_id) {
                Some(pawn) => Response::Snapshot { pawn },
                None => Response::error(format!("Unknown pawn {pawn_id}"), Some(name)),
            },

            Command::Path { from, to } => Response::Path {
                path: self.battle.path_between(from, to),
            },

            Command::Range { pawn_id } => {
                if self.battle.turns().resources(pawn_id).is_none() {
                    return Response::error(format!("Unknown pawn {pawn_id}"), Some(name));
                }
                let cells = self
                    .battle
                    .movement_range(pawn_id)
                    .into_iter()
                    .map(|(cell, cost)| RangeCell {
                        x: cell.x,
                        y: cell.y,
                        cost,
                    })
                    .collect();
                Response::Range { pawn_id, cells }
            }

            Command::Hash => Response::StateHash {
                hash: self.battle.state_hash(),
            },

            Command::Quit => {
                tracing::info!("Quit requested");
                self.should_quit = true;
                Response::Bye
            }
        }
    }

    fn interaction(&mut self, cmd: &str, outcome: Interaction) -> Response {
        Response::Interaction {
            cmd: cmd.to_string(),
            outcome,
            events: self.battle.drain_events(),
        }
    }

    fn hovered(&self, cell: Option<GridCoord>) -> Response {
        Response::Hovered {
            cell,
            preview: self.battle.preview_path().clone(),
        }
    }

    fn state(&self) -> BattleState {
        let battle = &self.battle;
        BattleState {
            phase: battle.phase(),
            selection: battle.selection_state(),
            inspected: battle.inspected_pawn(),
            hovered: battle.hovered_cell(),
            selected: battle.selected_cell(),
            preview: battle.preview_path().clone(),
            pawns: battle
                .pawn_ids()
                .into_iter()
                .filter_map(|id| battle.pawn_snapshot(id))
                .collect(),
            hash: battle.state_hash(),
        }
    }
}
