//! HTML for the task pages.

use std::fmt::Write as FmtWrite;

use crate::orbit::body::{Body, Zone};
use crate::render::svg::escape;

/// One task as listed on the index page.
#[derive(Debug, Clone, Copy)]
pub struct TaskInfo {
    pub number: u8,
    pub title: &'static str,
    pub summary: &'static str,
}

/// Every task, in route order.
pub const TASKS: [TaskInfo; 7] = [
    TaskInfo {
        number: 1,
        title: "Kepler's Third Law",
        summary: "Period against a^(3/2) for every body.",
    },
    TaskInfo {
        number: 2,
        title: "Planet Orbits",
        summary: "Static 2D or 3D orbit paths.",
    },
    TaskInfo {
        number: 3,
        title: "2D Orbit Animation",
        summary: "Bodies moving on their orbits, in the plane.",
    },
    TaskInfo {
        number: 4,
        title: "3D Orbit Animation",
        summary: "Bodies moving on their inclined orbits.",
    },
    TaskInfo {
        number: 5,
        title: "Angle vs Time",
        summary: "Circular and eccentric polar angle over 800 years.",
    },
    TaskInfo {
        number: 6,
        title: "Spirograph",
        summary: "Lines joining two bodies over ten slow orbits.",
    },
    TaskInfo {
        number: 7,
        title: "Imaginary Orbits",
        summary: "Orbits as seen from another body.",
    },
];

/// Task metadata by route number.
#[must_use]
pub fn task(number: u8) -> Option<&'static TaskInfo> {
    TASKS.iter().find(|t| t.number == number)
}

/// One checkbox in a body selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub zone: Zone,
    pub checked: bool,
}

impl Choice {
    /// A choice per body, checked when its name appears in `selected`
    /// (ignoring case).
    #[must_use]
    pub fn for_bodies<S: AsRef<str>>(bodies: &[Body], selected: &[S]) -> Vec<Self> {
        bodies
            .iter()
            .map(|b| Self {
                name: b.name.clone(),
                zone: b.zone(),
                checked: selected
                    .iter()
                    .any(|s| s.as_ref().trim().eq_ignore_ascii_case(&b.name)),
            })
            .collect()
    }
}

/// Input controls a task form can carry.
#[derive(Debug, Clone)]
pub enum Field {
    /// One checkbox per body, grouped inner/outer.
    Bodies(Vec<Choice>),
    /// Single body.
    Body(String),
    /// Center body for relative orbits.
    Center(String),
    /// 3D checkbox.
    ThreeD(bool),
}

/// What a page shows under its form.
#[derive(Debug, Clone)]
pub enum Graphic {
    Svg(String),
    /// Base64 GIF.
    Gif(String),
}

const STYLE: &str = "body{font-family:sans-serif;max-width:900px;margin:2em auto;color:#222}\
form{margin:1em 0}label{margin-right:1em}fieldset{margin:0.5em 0}figure{margin:0}\
img,svg{max-width:100%;height:auto}";

/// Select-all toggle for one zone's checkboxes.
const SCRIPT: &str = "function toggleZone(btn){var boxes=btn.parentElement.querySelectorAll('input.checkbox');\
var on=Array.prototype.some.call(boxes,function(b){return !b.checked;});\
boxes.forEach(function(b){b.checked=on;});btn.textContent=on?'Deselect All':'Select All';}";

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

/// Landing page linking every task.
#[must_use]
pub fn index<S: AsRef<str>>(bodies: &[S]) -> String {
    let mut body = String::from("<h1>Orrery</h1>\n<ul>\n");
    for task in &TASKS {
        let _ = writeln!(
            body,
            "<li><a href=\"/task/{}\">Task {}: {}</a> {}</li>",
            task.number,
            task.number,
            escape(task.title),
            escape(task.summary)
        );
    }
    body.push_str("</ul>\n<p>Bodies: ");
    let names: Vec<String> = bodies.iter().map(|b| escape(b.as_ref())).collect();
    body.push_str(&names.join(", "));
    body.push_str("</p>\n");
    shell("Orrery", &body)
}

/// Task page: heading, form, and the graphic if one was computed.
#[must_use]
pub fn task_page(info: &TaskInfo, fields: &[Field], graphic: Option<&Graphic>) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p><a href=\"/\">Home</a></p>\n<h1>Task {}: {}</h1>\n<p>{}</p>",
        info.number,
        escape(info.title),
        escape(info.summary)
    );

    if !fields.is_empty() {
        let _ = writeln!(body, "<form method=\"get\" action=\"/task/{}\">", info.number);
        if fields.iter().any(|f| matches!(f, Field::Bodies(_))) {
            let _ = writeln!(body, "<script>{SCRIPT}</script>");
        }
        for field in fields {
            body.push_str(&render_field(field));
        }
        body.push_str("<button type=\"submit\">Plot</button>\n</form>\n");
    }

    match graphic {
        Some(Graphic::Svg(svg)) => {
            let _ = write!(body, "<figure>\n{svg}</figure>\n");
        }
        Some(Graphic::Gif(data)) => {
            let _ = writeln!(
                body,
                "<figure><img alt=\"{}\" src=\"data:image/gif;base64,{data}\"></figure>",
                escape(info.title)
            );
        }
        None => {}
    }

    shell(info.title, &body)
}

fn render_choices(choices: &[Choice]) -> String {
    let mut out = String::new();
    for (zone, class, legend) in [
        (Zone::Inner, "inner", "Inner planets"),
        (Zone::Outer, "outer", "Outer planets"),
    ] {
        let group: Vec<&Choice> = choices.iter().filter(|c| c.zone == zone).collect();
        if group.is_empty() {
            continue;
        }
        let all_checked = group.iter().all(|c| c.checked);
        let _ = writeln!(
            out,
            "<fieldset class=\"{class}\"><legend>{legend}</legend>\n\
             <button type=\"button\" class=\"select_btn {class}\" onclick=\"toggleZone(this)\">{}</button>",
            if all_checked { "Deselect All" } else { "Select All" }
        );
        for choice in group {
            let name = escape(&choice.name);
            let _ = writeln!(
                out,
                "<label><input type=\"checkbox\" class=\"checkbox {class}\" name=\"bodies\" value=\"{name}\"{}> {name}</label>",
                if choice.checked { " checked" } else { "" }
            );
        }
        out.push_str("</fieldset>\n");
    }
    out
}

fn render_field(field: &Field) -> String {
    match field {
        Field::Bodies(choices) => render_choices(choices),
        Field::Body(value) => format!(
            "<label>Body <input name=\"body\" value=\"{}\"></label>\n",
            escape(value)
        ),
        Field::Center(value) => format!(
            "<label>Center <input name=\"center\" value=\"{}\"></label>\n",
            escape(value)
        ),
        Field::ThreeD(checked) => format!(
            "<label><input type=\"checkbox\" name=\"three_d\" value=\"true\"{}> 3D</label>\n",
            if *checked { " checked" } else { "" }
        ),
    }
}
