//! Line-oriented planner shell
//!
//! Each input line is one command. Canvas notifications raised by a command
//! are folded into the overview once the command has run, the way a UI
//! would on its next frame.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use seatplan_core::{
    CanvasSurface, DropOutcome, DropTarget, HallRepository, OverviewRender, PanelResponse,
    PointerEvent, PointerKind, TableId,
};

use crate::state::AppState;

const HELP: &str = "\
person add <name> [group]     add an unseated guest
person delete <name>          drop a guest from the roster
person remove <name>          unseat and drop a guest
unseat <name>                 return a seated guest to the roster
table add <chairs>            add an empty table
table delete <id>             delete a table and its seating
table move <id> <x> <y>       move a table on the canvas
drag group <label>            start dragging a group
drag person <name>            start dragging one unseated guest
drop table <id> | drop new | drop chair <id> <n> | drop outside
cancel                        abandon the current drag
scroll <dx> <dy> | zoom <notches> <x> <y> | resize <w> <h>
overview toggle | overview click <x> <y> | overview move <x0> <y0> <x1> <y1>
hall save [name] | hall open <name|id> | hall list | hall delete <name|id>
show | groups | help | quit";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("not a number: {0}")]
    Number(String),

    #[error(transparent)]
    Core(#[from] seatplan_core::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPerson { name: String, group: String },
    DeletePerson(String),
    RemovePerson(String),
    Unseat(String),
    AddTable(usize),
    DeleteTable(TableId),
    MoveTable { id: TableId, x: f64, y: f64 },
    DragGroup(String),
    DragPerson(String),
    Drop(DropTarget),
    Cancel,
    Scroll { dx: f64, dy: f64 },
    Zoom { notches: f64, x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    OverviewToggle,
    OverviewClick { x: f64, y: f64 },
    OverviewMove { from: (f64, f64), to: (f64, f64) },
    HallSave(Option<String>),
    HallOpen(String),
    HallList,
    HallDelete(String),
    Show,
    Groups,
    Help,
    Quit,
}

fn number<T: FromStr>(token: &str) -> Result<T, ShellError> {
    token
        .parse()
        .map_err(|_| ShellError::Number(token.to_string()))
}

fn table_id(token: &str) -> Result<TableId, ShellError> {
    number(token).map(TableId)
}

impl FromStr for Command {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let command = match tokens.as_slice() {
            ["person", "add", name] => Command::AddPerson {
                name: name.to_string(),
                group: String::new(),
            },
            ["person", "add", name, group] => Command::AddPerson {
                name: name.to_string(),
                group: group.to_string(),
            },
            ["person", "add", ..] => return Err(ShellError::Usage("person add <name> [group]")),
            ["person", "delete", name] => Command::DeletePerson(name.to_string()),
            ["person", "remove", name] => Command::RemovePerson(name.to_string()),
            ["person", ..] => return Err(ShellError::Usage("person add|delete|remove <name>")),
            ["unseat", name] => Command::Unseat(name.to_string()),

            ["table", "add", chairs] => Command::AddTable(number(chairs)?),
            ["table", "delete", id] => Command::DeleteTable(table_id(id)?),
            ["table", "move", id, x, y] => Command::MoveTable {
                id: table_id(id)?,
                x: number(x)?,
                y: number(y)?,
            },
            ["table", ..] => {
                return Err(ShellError::Usage("table add <chairs> | delete <id> | move <id> <x> <y>"))
            }

            ["drag", "group", label] => Command::DragGroup(label.to_string()),
            ["drag", "person", name] => Command::DragPerson(name.to_string()),
            ["drag", ..] => return Err(ShellError::Usage("drag group <label> | drag person <name>")),
            ["drop", "table", id] => Command::Drop(DropTarget::Table(table_id(id)?)),
            ["drop", "new"] => Command::Drop(DropTarget::NewTable),
            ["drop", "chair", id, chair] => Command::Drop(DropTarget::Chair {
                table_id: table_id(id)?,
                chair: number(chair)?,
            }),
            ["drop", "outside"] => Command::Drop(DropTarget::Outside),
            ["drop", ..] => {
                return Err(ShellError::Usage(
                    "drop table <id> | drop new | drop chair <id> <n> | drop outside",
                ))
            }
            ["cancel"] => Command::Cancel,

            ["scroll", dx, dy] => Command::Scroll {
                dx: number(dx)?,
                dy: number(dy)?,
            },
            ["zoom", notches, x, y] => Command::Zoom {
                notches: number(notches)?,
                x: number(x)?,
                y: number(y)?,
            },
            ["resize", width, height] => Command::Resize {
                width: number(width)?,
                height: number(height)?,
            },

            ["overview", "toggle"] => Command::OverviewToggle,
            ["overview", "click", x, y] => Command::OverviewClick {
                x: number(x)?,
                y: number(y)?,
            },
            ["overview", "move", x0, y0, x1, y1] => Command::OverviewMove {
                from: (number(x0)?, number(y0)?),
                to: (number(x1)?, number(y1)?),
            },
            ["overview", ..] => {
                return Err(ShellError::Usage(
                    "overview toggle | click <x> <y> | move <x0> <y0> <x1> <y1>",
                ))
            }

            ["hall", "save"] => Command::HallSave(None),
            ["hall", "save", name] => Command::HallSave(Some(name.to_string())),
            ["hall", "open", key] => Command::HallOpen(key.to_string()),
            ["hall", "list"] => Command::HallList,
            ["hall", "delete", key] => Command::HallDelete(key.to_string()),
            ["hall", ..] => {
                return Err(ShellError::Usage(
                    "hall save [name] | open <name|id> | list | delete <name|id>",
                ))
            }

            ["show"] => Command::Show,
            ["groups"] => Command::Groups,
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            [first, ..] => return Err(ShellError::Unknown(first.to_string())),
            [] => return Err(ShellError::Usage("empty line")),
        };

        Ok(command)
    }
}

/// Run one command against the application state and describe the result
pub fn execute(state: &mut AppState, command: Command) -> Result<String, ShellError> {
    let message = match command {
        Command::AddPerson { name, group } => {
            state.session_mut().add_person(&name, &group)?;
            format!("added {}", name)
        }
        Command::DeletePerson(name) => {
            state.session_mut().delete_person(&name);
            format!("deleted {} from the roster", name)
        }
        Command::RemovePerson(name) => {
            if state.session_mut().remove_person_completely(&name) {
                format!("removed {}", name)
            } else {
                format!("{} was not found", name)
            }
        }
        Command::Unseat(name) => {
            state.session_mut().unseat_person(&name)?;
            format!("{} is unseated", name)
        }

        Command::AddTable(chairs) => {
            let id = state.session_mut().add_table(chairs)?;
            format!("table {} added with {} chairs", id, chairs)
        }
        Command::DeleteTable(id) => {
            let table = state.session_mut().delete_table(id)?;
            format!(
                "table {} deleted, {} guests dropped",
                id,
                table.occupants().count()
            )
        }
        Command::MoveTable { id, x, y } => {
            state.session_mut().move_table(id, x, y)?;
            format!("table {} moved to ({}, {})", id, x, y)
        }

        Command::DragGroup(label) => {
            state.session_mut().begin_group_drag(&label)?;
            format!("dragging group {}", label)
        }
        Command::DragPerson(name) => {
            state.session_mut().begin_person_drag(&name)?;
            format!("dragging {}", name)
        }
        Command::Drop(target) => match state.session_mut().drop_on(target)? {
            DropOutcome::Seated { table_id, count } => {
                format!("seated {} at table {}", count, table_id)
            }
            DropOutcome::TableCreated(id) => format!("table {} created", id),
            DropOutcome::Ignored => "nothing dropped".to_string(),
        },
        Command::Cancel => {
            state.session_mut().cancel_drag();
            "drag cancelled".to_string()
        }

        Command::Scroll { dx, dy } => {
            state.canvas_mut().scroll_by(dx, dy);
            describe_canvas(state)
        }
        Command::Zoom { notches, x, y } => {
            state.canvas_mut().wheel_zoom(notches, x, y);
            describe_canvas(state)
        }
        Command::Resize { width, height } => {
            state.canvas_mut().resize(width, height);
            describe_canvas(state)
        }

        Command::OverviewToggle => {
            let (session, canvas) = state.parts_mut();
            let visible = session.toggle_overview(&*canvas);
            state.persist_panel()?;
            let message = if visible { "overview shown" } else { "overview hidden" };
            message.to_string()
        }
        Command::OverviewClick { x, y } => {
            let (session, canvas) = state.parts_mut();
            match session.overview_pointer(PointerEvent::new(PointerKind::Click, x, y), canvas) {
                PanelResponse::Navigated(target) => {
                    format!("canvas scrolled to ({:.0}, {:.0})", target.x, target.y)
                }
                _ => "click ignored".to_string(),
            }
        }
        Command::OverviewMove { from, to } => {
            let (session, canvas) = state.parts_mut();
            let down =
                session.overview_pointer(PointerEvent::new(PointerKind::Down, from.0, from.1), canvas);
            if down != PanelResponse::DragStarted {
                return Ok("overview not grabbed".to_string());
            }
            session.overview_pointer(PointerEvent::new(PointerKind::Move, to.0, to.1), canvas);
            session.overview_pointer(PointerEvent::new(PointerKind::Up, to.0, to.1), canvas);
            let position = session.overview().position();
            state.persist_panel()?;
            format!("overview moved to ({}, {})", position.x, position.y)
        }

        Command::HallSave(name) => {
            let hall = state.save_hall(name.as_deref())?;
            format!("saved hall {} ({})", hall.name, hall.id)
        }
        Command::HallOpen(key) => {
            let id = state.resolve_hall(&key)?.id;
            let hall = state.open_hall(id)?;
            format!("opened hall {} with {} tables", hall.name, hall.tables.len())
        }
        Command::HallList => {
            let halls = state.db().load_halls()?;
            if halls.is_empty() {
                "no saved halls".to_string()
            } else {
                halls
                    .iter()
                    .map(|h| {
                        format!(
                            "{}  {}  {} tables, {} seated, created {}",
                            h.id,
                            h.name,
                            h.tables.len(),
                            h.seated_count(),
                            h.created_at.format("%Y-%m-%d")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::HallDelete(key) => {
            let hall = state.resolve_hall(&key)?;
            state.delete_hall(hall.id)?;
            format!("deleted hall {}", hall.name)
        }

        Command::Show => describe_layout(state),
        Command::Groups => describe_groups(state),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };

    state.frame();
    Ok(message)
}

fn describe_canvas(state: &AppState) -> String {
    let m = state.canvas().metrics();
    format!(
        "canvas at ({:.0}, {:.0}) zoom {:.2}, view {}x{}",
        m.scroll_x, m.scroll_y, m.zoom, m.view_width, m.view_height
    )
}

fn describe_layout(state: &AppState) -> String {
    let session = state.session();
    let store = session.store();
    let mut out = String::new();

    if let Some(hall) = state.current_hall() {
        let _ = writeln!(out, "hall {}", hall.name);
    }
    for table in store.tables() {
        let chairs: Vec<&str> = table
            .people
            .iter()
            .map(|p| p.as_ref().map_or("-", |p| p.name.as_str()))
            .collect();
        let _ = writeln!(
            out,
            "table {} at ({}, {}): [{}]",
            table.id,
            table.x,
            table.y,
            chairs.join(", ")
        );
    }

    let unseated: Vec<String> = store.unseated_people().into_iter().map(|p| p.name).collect();
    let _ = writeln!(out, "unseated: {}", unseated.join(", "));

    match session.render_overview() {
        OverviewRender::Hidden { position } => {
            let _ = write!(out, "overview hidden at ({}, {})", position.x, position.y);
        }
        OverviewRender::Visible(frame) => {
            let v = frame.viewport;
            let _ = write!(
                out,
                "overview at ({}, {}), scale {:.4}, viewport ({:.1}, {:.1}) {:.1}x{:.1}",
                frame.position.x,
                frame.position.y,
                session.overview().projector().scale(),
                v.x,
                v.y,
                v.width,
                v.height
            );
        }
    }
    if let Some(payload) = session.drag().payload() {
        let _ = write!(out, "\ndragging {:?}", payload);
    }

    out
}

fn describe_groups(state: &AppState) -> String {
    let store = state.session().store();
    let groups = store.groups();
    if groups.is_empty() {
        return "no groups".to_string();
    }

    groups
        .iter()
        .map(|g| {
            let members: Vec<String> = g
                .members
                .iter()
                .map(|p| match store.seat_of(&p.name) {
                    Some((table, chair)) => format!("{}@{}:{}", p.name, table, chair),
                    None => p.name.clone(),
                })
                .collect();
            format!("{} ({}): {}", g.label, g.len(), members.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read commands until `quit` or end of input
pub fn run<R: BufRead, W: Write>(state: &mut AppState, input: R, mut output: W) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(output, "> ")?;
            output.flush()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => match execute(state, command) {
                Ok(message) => writeln!(output, "{}", message)?,
                Err(e) => {
                    tracing::debug!(error = %e, "Command failed");
                    writeln!(output, "error: {}", e)?;
                }
            },
            Err(e) => writeln!(output, "error: {}", e)?,
        }

        write!(output, "> ")?;
        output.flush()?;
    }

    Ok(())
}
