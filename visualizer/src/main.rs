use boardcore::scoreboard::{Cell, Grid, ScoreboardModel};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Target Board Scoreboard".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    scenario: ScenarioForm,
    payload: Option<ScoreboardPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<ScoreboardPayload, String>),
    ScenarioFieldChanged(ScenarioField, String),
    SubmitScenario,
    ScenarioSubmitted(Result<String, String>),
    ExportRound,
    ExportFinished(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum ScenarioField {
    Shots,
    Targets,
    HitRatio,
    Jitter,
    Dropout,
    Seed,
    Description,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                scenario: ScenarioForm::default(),
                payload: None,
                status: "Waiting for scoreboard...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.status = format!(
                    "Scoreboard received: {} assigned / {} unassigned",
                    payload.assigned, payload.unassigned
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Scoreboard error: {err}");
                Task::none()
            }
            Message::ScenarioFieldChanged(field, value) => {
                state.scenario.update_field(field, value);
                Task::none()
            }
            Message::SubmitScenario => {
                let payload = state.scenario.to_payload();
                Task::perform(post_scenario(payload), Message::ScenarioSubmitted)
            }
            Message::ScenarioSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Scenario submitted".into());
                Task::none()
            }
            Message::ScenarioSubmitted(Err(err)) => {
                state.status = format!("Scenario error: {err}");
                Task::none()
            }
            Message::ExportRound => Task::perform(post_export(), Message::ExportFinished),
            Message::ExportFinished(Ok(message)) => {
                state.status = message;
                state.push_history("Round exported to CSV".into());
                Task::none()
            }
            Message::ExportFinished(Err(err)) => {
                state.status = format!("Export error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let scenario_column = column![
            text("Scenario").size(26),
            text_input("Shots per round", &state.scenario.shots)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Shots, value))
                .padding(6),
            text_input("Shooters", &state.scenario.targets)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Targets, value))
                .padding(6),
            text_input("Hit ratio", &state.scenario.hit_ratio)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::HitRatio, value))
                .padding(6),
            text_input("Jitter (px)", &state.scenario.jitter)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Jitter, value))
                .padding(6),
            text_input("Dropout", &state.scenario.dropout)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Dropout, value))
                .padding(6),
            text_input("Seed", &state.scenario.seed)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Seed, value))
                .padding(6),
            text_input("Description", &state.scenario.description)
                .on_input(|value| Message::ScenarioFieldChanged(ScenarioField::Description, value))
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitScenario)
                .padding(10),
            button("Export round to CSV")
                .on_press(Message::ExportRound)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Parameter definitions").size(16),
                text("Shots per round: rows of the board; shot 1 is the bottom row.").size(12),
                text("Shooters: columns of the board, left to right.").size(12),
                text("Hit ratio: probability that a generated mark is a hit.").size(12),
                text("Jitter: random center displacement, simulating camera noise.").size(12),
                text("Dropout: marks missing from the top of the board, as in a round in progress.")
                    .size(12),
                text("Seed: deterministic PRNG seeding so scenes replay consistently.").size(12),
                text("Description: free-text note included in the ingest log.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let summary = if let Some(payload) = &state.payload {
            text(format!(
                "Marks: {} assigned / {} unassigned",
                payload.assigned, payload.unassigned
            ))
            .size(18)
        } else {
            text("Marks: n/a").size(18)
        };

        let scoreboard = state
            .payload
            .as_ref()
            .map(|payload| payload.scoreboard.clone())
            .unwrap_or_default();
        let table = scoreboard_table(&scoreboard);

        let board_canvas = Canvas::new(BoardCanvas {
            grid: state.payload.as_ref().and_then(|payload| payload.grid.clone()),
        })
        .width(Length::Fill)
        .height(Length::Fixed(260.0));

        let notes = state
            .payload
            .as_ref()
            .map(|payload| payload.notes.clone())
            .unwrap_or_default();
        let notes_list = if notes.is_empty() {
            Column::new().push(text("No notes yet").size(14))
        } else {
            notes
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, note| {
                    col.push(text(note.clone()).size(14))
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let scoreboard_column = column![
            text("Scoreboard").size(26),
            summary,
            Container::new(table).padding(6),
            text("Board view").size(16),
            board_canvas,
            text("Round notes").size(16),
            Container::new(scrollable(notes_list).height(Length::Fixed(90.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![scenario_column, scoreboard_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

/// Renders the fixed-layout glyph table: row labels down the left,
/// shooter labels across the top.
fn scoreboard_table(model: &ScoreboardModel) -> Element<'static, Message> {
    let mut header = Row::new()
        .spacing(6)
        .push(text("").width(Length::Fixed(70.0)));
    for label in &model.shooter_labels {
        header = header.push(text(label.clone()).size(14).width(Length::Fixed(80.0)));
    }

    let mut table = Column::new().spacing(6).push(header);
    for (label, glyphs) in model.row_labels.iter().zip(&model.glyphs) {
        let mut line = Row::new()
            .spacing(6)
            .push(text(label.clone()).size(14).width(Length::Fixed(70.0)));
        for glyph in glyphs {
            line = line.push(text(glyph.clone()).size(22).width(Length::Fixed(80.0)));
        }
        table = table.push(line);
    }
    table.into()
}

async fn fetch_payload() -> Result<ScoreboardPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9100/scoreboard")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<ScoreboardPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_scenario(config: ScenarioConfig) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9100/ingest-config")
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

async fn post_export() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9100/export")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Round exported".into())
    } else {
        Err(format!("{}", response.status()))
    }
}

#[derive(Debug, Clone)]
struct ScenarioForm {
    shots: String,
    targets: String,
    hit_ratio: String,
    jitter: String,
    dropout: String,
    seed: String,
    description: String,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        Self {
            shots: "4".into(),
            targets: "5".into(),
            hit_ratio: "0.6".into(),
            jitter: "8".into(),
            dropout: "0".into(),
            seed: "0".into(),
            description: "Visualizer scenario".into(),
        }
    }
}

impl ScenarioForm {
    fn update_field(&mut self, field: ScenarioField, value: String) {
        match field {
            ScenarioField::Shots => self.shots = value,
            ScenarioField::Targets => self.targets = value,
            ScenarioField::HitRatio => self.hit_ratio = value,
            ScenarioField::Jitter => self.jitter = value,
            ScenarioField::Dropout => self.dropout = value,
            ScenarioField::Seed => self.seed = value,
            ScenarioField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> ScenarioConfig {
        ScenarioConfig {
            num_shots: self.shots.parse().ok(),
            num_targets: self.targets.parse().ok(),
            hit_ratio: self.hit_ratio.parse().ok(),
            jitter: self.jitter.parse().ok(),
            dropout: self.dropout.parse().ok(),
            seed: self.seed.parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

/// Subset of the bridge's scene config; unset fields fall back to the
/// server-side defaults.
#[derive(Debug, Serialize)]
struct ScenarioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    num_shots: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_targets: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hit_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jitter: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropout: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoreboardPayload {
    #[serde(default)]
    scoreboard: ScoreboardModel,
    #[serde(default)]
    grid: Option<Grid>,
    #[serde(default)]
    assigned: usize,
    #[serde(default)]
    unassigned: usize,
    #[serde(default)]
    notes: Vec<String>,
}

/// Draws the board as the camera sees it: one lattice cell per grid
/// position, circles for hits, crosses for misses.
#[derive(Clone)]
struct BoardCanvas {
    grid: Option<Grid>,
}

impl canvas::Program<Message> for BoardCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let Some(grid) = &self.grid else {
            return vec![frame.into_geometry()];
        };
        if grid.rows() == 0 || grid.columns() == 0 {
            return vec![frame.into_geometry()];
        }

        let cell_width = bounds.width / grid.columns() as f32;
        let cell_height = bounds.height / grid.rows() as f32;

        let lattice = Path::new(|builder| {
            for row in 1..grid.rows() {
                let y = row as f32 * cell_height;
                builder.move_to(Point::new(0.0, y));
                builder.line_to(Point::new(bounds.width, y));
            }
            for col in 1..grid.columns() {
                let x = col as f32 * cell_width;
                builder.move_to(Point::new(x, 0.0));
                builder.line_to(Point::new(x, bounds.height));
            }
        });
        frame.stroke(
            &lattice,
            Stroke::default()
                .with_color(Color::from_rgb(0.25, 0.25, 0.3))
                .with_width(1.0),
        );

        let mark_radius = (cell_width.min(cell_height) / 2.0 - 8.0).max(4.0);
        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                let center = Point::new(
                    col as f32 * cell_width + cell_width / 2.0,
                    row as f32 * cell_height + cell_height / 2.0,
                );
                match grid.get(row, col) {
                    Some(Cell::Hit) => {
                        let circle = Path::new(|builder| builder.circle(center, mark_radius));
                        frame.stroke(
                            &circle,
                            Stroke::default()
                                .with_width(3.0)
                                .with_color(Color::from_rgb(0.2, 0.85, 0.35)),
                        );
                    }
                    Some(Cell::Miss) => {
                        let cross = Path::new(|builder| {
                            builder.move_to(Point::new(
                                center.x - mark_radius,
                                center.y - mark_radius,
                            ));
                            builder.line_to(Point::new(
                                center.x + mark_radius,
                                center.y + mark_radius,
                            ));
                            builder.move_to(Point::new(
                                center.x + mark_radius,
                                center.y - mark_radius,
                            ));
                            builder.line_to(Point::new(
                                center.x - mark_radius,
                                center.y + mark_radius,
                            ));
                        });
                        frame.stroke(
                            &cross,
                            Stroke::default()
                                .with_width(3.0)
                                .with_color(Color::from_rgb(0.9, 0.3, 0.25)),
                        );
                    }
                    _ => {}
                }
            }
        }

        vec![frame.into_geometry()]
    }
}
