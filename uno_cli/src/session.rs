//! Hot-seat console session.
//!
//! Every command acts for the player whose turn it is. The session forwards
//! moves to the engine, logs them, and prints whatever the engine announced
//! on its event bus.

use anyhow::{Context, Result};
use log::{info, warn};
use std::{
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};
use uno::{
    Card, DomainEvent, EventLogger, EventRecorder, Game, GameError, GameEvent, PlayerId,
    PlayerInfo,
};

use crate::commands::{Command, ParseError, parse_command};

pub const COMMANDS_HELP: &str = "\
COMMANDS:
  hand                 Show your cards
  top                  Show the card to beat
  play CARD [uno]      Play a card, e.g. 'play red 7', 'play g+2', 'play w4 blue uno'
  draw                 Draw a card (your turn continues)
  pass                 End your turn
  players              Show seating order and hand sizes
  help                 Show this message
  quit                 Leave the game
";

/// Seat line shown by the `players` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    pub info: PlayerInfo,
    pub cards: usize,
    pub is_current: bool,
}

/// What a successfully applied command has to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Hand(Vec<Card>),
    Top(Card),
    Players(Vec<Seat>),
    Help,
    Done,
    Quit,
}

pub struct Session {
    game: Game,
    names: HashMap<PlayerId, String>,
    feed: Rc<EventRecorder>,
}

impl Session {
    pub fn new(game: Game) -> Self {
        let names = game
            .players()
            .into_iter()
            .map(|player| (player.id, player.name.to_string()))
            .collect();
        let feed = Rc::new(EventRecorder::new());
        let events = game.events();
        let subscribed = events.subscribe(feed.clone()).is_some()
            && events.subscribe(Rc::new(EventLogger)).is_some();
        if !subscribed {
            warn!("Event bus busy, game events won't be shown");
        }
        Self { game, names, feed }
    }

    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    fn name(&self, id: PlayerId) -> &str {
        self.names.get(&id).map_or("someone", String::as_str)
    }

    /// Apply one command for the current player.
    pub fn apply(&mut self, command: Command) -> Result<Reply, GameError> {
        let current = self.game.current_player();
        match command {
            Command::Hand => Ok(Reply::Hand(
                self.game.hand_cards(current.id)?.copied().collect(),
            )),
            Command::Top => Ok(Reply::Top(self.game.peek_top_card())),
            Command::Players => Ok(Reply::Players(self.seats()?)),
            Command::Help => Ok(Reply::Help),
            Command::Quit => Ok(Reply::Quit),
            Command::Play { card, said_uno } => {
                info!("{} plays {card} (said uno: {said_uno})", current.name);
                self.game.check_turn(current.id)?;
                self.game.play_card(current.id, card, said_uno)?;
                Ok(Reply::Done)
            }
            Command::Draw => {
                info!("{} draws", current.name);
                self.game.check_turn(current.id)?;
                self.game.draw_card(current.id)?;
                Ok(Reply::Done)
            }
            Command::Pass => {
                info!("{} passes", current.name);
                self.game.pass_turn(current.id)?;
                Ok(Reply::Done)
            }
        }
    }

    fn seats(&self) -> Result<Vec<Seat>, GameError> {
        let current = self.game.current_player().id;
        self.game
            .players()
            .into_iter()
            .map(|info| {
                let cards = self.game.hand_cards(info.id)?.count();
                Ok(Seat {
                    is_current: info.id == current,
                    info,
                    cards,
                })
            })
            .collect()
    }

    fn describe(&self, event: &DomainEvent) -> String {
        match &event.kind {
            GameEvent::CardPlayed {
                player_id,
                card,
                said_uno,
            } => {
                let uno = if *said_uno { " UNO!" } else { "" };
                format!("{} played {card}.{uno}", self.name(*player_id))
            }
            GameEvent::CardDrawn { player_id } => {
                format!("{} drew a card.", self.name(*player_id))
            }
            GameEvent::GameOver { winner } => format!("{} wins the game!", winner.name),
        }
    }

    /// Print and forget every event published since the last call.
    fn flush_events<W: Write>(&self, output: &mut W) -> Result<()> {
        for event in self.feed.events() {
            writeln!(output, "  * {}", self.describe(&event))?;
        }
        self.feed.clear();
        Ok(())
    }

    fn render<W: Write>(&self, reply: &Reply, output: &mut W) -> Result<()> {
        match reply {
            Reply::Hand(cards) => {
                let cards: Vec<String> = cards.iter().map(ToString::to_string).collect();
                writeln!(output, "Your hand: {}", cards.join(", "))?;
            }
            Reply::Top(card) => writeln!(output, "Top card: {card}")?,
            Reply::Players(seats) => {
                for seat in seats {
                    let marker = if seat.is_current { ">" } else { " " };
                    writeln!(output, "{marker} {} ({} cards)", seat.info, seat.cards)?;
                }
                writeln!(output, "Direction: {}", self.game.direction())?;
            }
            Reply::Help => write!(output, "{COMMANDS_HELP}")?,
            Reply::Done | Reply::Quit => {}
        }
        Ok(())
    }

    /// Handle one input line. Returns `false` once the session should stop.
    pub fn handle_line<W: Write>(&mut self, line: &str, output: &mut W) -> Result<bool> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Ok(true),
            Err(err) => {
                writeln!(output, "{err}")?;
                return Ok(true);
            }
        };
        match self.apply(command) {
            Ok(reply) => {
                self.render(&reply, output)?;
                if reply == Reply::Quit {
                    return Ok(false);
                }
            }
            Err(err) => writeln!(output, "Can't do that: {err}")?,
        }
        self.flush_events(output)?;
        Ok(!self.game.is_over())
    }

    fn prompt<W: Write>(&self, output: &mut W) -> Result<()> {
        let current = self.game.current_player();
        write!(
            output,
            "[{} on top] {}> ",
            self.game.peek_top_card(),
            current.name
        )?;
        output.flush()?;
        Ok(())
    }

    /// Read commands until the game ends, the player quits, or input runs
    /// out.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(
            output,
            "{} players, {} cards each. Type 'help' for commands.",
            self.names.len(),
            self.game.settings().hand_size
        )?;
        self.prompt(&mut output)?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if !self.handle_line(&line, &mut output)? {
                break;
            }
            self.prompt(&mut output)?;
        }
        writeln!(output)?;
        Ok(())
    }
}
