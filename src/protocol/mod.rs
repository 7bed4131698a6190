//! JSON request/response surface, one message per line.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::session::{HistoryMove, Session, SessionResult};
use crate::tools::{SettingOutcome, SettingValue, ToolKind, ToolSettings};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    Init,
    SetTool {
        tool: String,
    },
    UpdateSetting {
        key: String,
        value: SettingValue,
    },
    StartDrawing {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    ContinueDrawing {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    EndDrawing {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Undo,
    Redo,
    Clear,
    Save {
        #[serde(default)]
        filename: Option<String>,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_undo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_redo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tool: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_redraw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ToolSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Response {
    fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    fn with_history(mut self, session: &Session) -> Self {
        self.can_undo = Some(session.can_undo());
        self.can_redo = Some(session.can_redo());
        self
    }

    fn with_tool(mut self, session: &Session) -> Self {
        let tool = session.tool();
        self.current_tool = Some(tool.name());
        self.cursor = Some(tool.cursor());
        self.requires_redraw = Some(tool.requires_redraw());
        self.settings = Some(session.settings().clone());
        self
    }
}

/// Parses one request line and applies it to `session`.
pub fn handle_line(session: &mut Session, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(session, request),
        Err(err) => {
            tracing::warn!(%err, "malformed request");
            Response::failure(format!("invalid request: {err}"))
        }
    }
}

pub fn dispatch(session: &mut Session, request: Request) -> Response {
    tracing::debug!(?request, "dispatching request");
    try_dispatch(session, request).unwrap_or_else(|err| Response::failure(err.to_string()))
}

fn try_dispatch(session: &mut Session, request: Request) -> SessionResult<Response> {
    let response = match request {
        Request::Init => {
            let tools = ToolKind::ALL
                .into_iter()
                .map(|kind| ToolInfo {
                    name: kind.name(),
                    icon: kind.icon(),
                })
                .collect();
            Response {
                tools: Some(tools),
                image: Some(session.encoded_canvas()?),
                ..Response::ok()
            }
            .with_tool(session)
            .with_history(session)
        }
        Request::SetTool { tool } => {
            session.select_tool(&tool)?;
            Response::ok().with_tool(session)
        }
        Request::UpdateSetting { key, value } => match session.update_setting(&key, value)? {
            SettingOutcome::Applied | SettingOutcome::NotApplicable => Response {
                settings: Some(session.settings().clone()),
                ..Response::ok()
            },
            SettingOutcome::Ignored => Response::ok(),
        },
        Request::StartDrawing { x, y } => {
            session.start_drawing(Point::new(x, y));
            preview_response(session)?
        }
        Request::ContinueDrawing { x, y } => {
            session.continue_drawing(Point::new(x, y));
            preview_response(session)?
        }
        Request::EndDrawing { x, y } => {
            if session.end_drawing(Point::new(x, y)) {
                image_response(session)?
            } else {
                Response::failure("nothing to commit").with_history(session)
            }
        }
        Request::Undo => match session.undo()? {
            HistoryMove::Nothing => Response::failure("nothing to undo").with_history(session),
            _ => image_response(session)?,
        },
        Request::Redo => match session.redo() {
            HistoryMove::Nothing => Response::failure("nothing to redo").with_history(session),
            _ => image_response(session)?,
        },
        Request::Clear => {
            session.clear();
            image_response(session)?
        }
        Request::Save { filename } => {
            let exported = session.export(None, filename.as_deref())?;
            Response {
                path: Some(exported.path.display().to_string()),
                filename: Some(exported.filename),
                ..Response::ok()
            }
        }
        Request::Resize { width, height } => {
            session.resize(width, height)?;
            image_response(session)?
        }
    };
    Ok(response)
}

fn preview_response(session: &Session) -> SessionResult<Response> {
    Ok(Response {
        preview: Some(session.encoded_preview()?),
        requires_redraw: Some(session.tool().requires_redraw()),
        ..Response::ok()
    })
}

fn image_response(session: &Session) -> SessionResult<Response> {
    Ok(Response {
        image: Some(session.encoded_canvas()?),
        ..Response::ok()
    }
    .with_history(session))
}

/// Serves requests from `input` until EOF, one JSON response per line.
pub fn serve<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(session, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    tracing::info!("input closed");
    Ok(())
}
