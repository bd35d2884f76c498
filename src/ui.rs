use crate::client::{ClientState, View};
use crate::models::{bristol_type, LogEntry, NewLogEntry, BRISTOL_SCALE, COLORS, QUANTITIES, SMELLS, URGENCIES};
use crate::stats::{local_datetime, DashboardStats, DayGroup};
use chrono::Local;

pub fn render_page(state: &ClientState) -> String {
    let body = match (state.view, state.draft.as_ref()) {
        (View::NewLog, Some(draft)) => render_form(draft),
        _ => render_dashboard(&state.dashboard(), &state.history(), state.loading),
    };
    LAYOUT.replace("{{BODY}}", &body)
}

pub fn render_dashboard(stats: &DashboardStats, history: &[DayGroup<'_>], loading: bool) -> String {
    let mut html = format!(
        r#"<header class="bar"><h1>Gut Log</h1><a class="btn" href="/new">+ New Entry</a></header>
<section class="panel">
  <div class="stat"><span class="label">Today</span><span class="value" id="today-count">{}</span></div>
  <div class="stat"><span class="label">Last entry</span><span class="value" id="last-entry">{}</span></div>
  <div class="stat"><span class="label">Avg Bristol</span><span class="value" id="avg-bristol">{}</span></div>
</section>
<h2>History</h2>
"#,
        stats.today_count,
        stats.last_entry_display(),
        stats.average_display(),
    );

    if loading {
        html.push_str(r#"<p class="empty">Loading…</p>"#);
    } else if history.is_empty() {
        html.push_str(r#"<p class="empty">No entries yet. Start tracking to see patterns.</p>"#);
    } else {
        for group in history {
            html.push_str(&format!(r#"<section class="day"><h3>{}</h3>"#, html_escape(&group.label)));
            for log in &group.entries {
                html.push_str(&render_card(log));
            }
            html.push_str("</section>");
        }
    }
    html
}

fn render_card(log: &LogEntry) -> String {
    let time = local_datetime(&Local, &log.timestamp)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default();
    let description = bristol_type(log.bristol_score)
        .map(|kind| format!("{}: {}", kind.label, kind.description))
        .unwrap_or_else(|| format!("Score {}", log.bristol_score));

    let badges: String = badges(log)
        .into_iter()
        .map(|badge| format!(r#"<span class="badge">{}</span>"#, html_escape(&badge)))
        .collect();
    let notes = if log.notes.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="notes">"{}"</p>"#, html_escape(&log.notes))
    };

    format!(
        r#"<article class="card">
  <div class="score">{score}</div>
  <div class="detail"><div class="meta">{time} · {description}</div><div class="badges">{badges}</div>{notes}</div>
  <form method="post" action="/logs/{id}/delete" onsubmit="return confirm('Are you sure you want to delete this entry?')">
    <button class="delete" type="submit" aria-label="Delete entry">✕</button>
  </form>
</article>"#,
        score = log.bristol_score,
        time = html_escape(&time),
        description = html_escape(&description),
        id = log.id,
    )
}

/// Labels shown under an entry. Normal values are left out.
pub fn badges(log: &LogEntry) -> Vec<String> {
    let mut out = vec![log.quantity.clone(), log.color.clone()];
    if log.urgency != "Normal" {
        out.push(log.urgency.clone());
    }
    if log.pain_level > 0 {
        out.push(format!("Pain: {}/10", log.pain_level));
    }
    if log.is_floating {
        out.push("Floating/Greasy".to_string());
    }
    if log.has_blood {
        out.push("Blood".to_string());
    }
    if log.has_mucus {
        out.push("Mucus".to_string());
    }
    if log.smell != "Normal" {
        out.push(format!("Smell: {}", log.smell));
    }
    out.retain(|badge| !badge.is_empty());
    out
}

pub fn render_form(draft: &NewLogEntry) -> String {
    let local_value = local_datetime(&Local, &draft.timestamp)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default();

    let bristol: String = BRISTOL_SCALE
        .iter()
        .map(|kind| {
            format!(
                r#"<label class="option"><input type="radio" name="bristol_score" value="{score}"{checked}/> <b>{score}</b> {label}: {description}</label>"#,
                score = kind.score,
                checked = checked(draft.bristol_score == kind.score),
                label = kind.label,
                description = kind.description,
            )
        })
        .collect();

    format!(
        r#"<header class="bar"><h1>New Entry</h1><a class="btn ghost" href="/">Cancel</a></header>
<form class="entry" method="post" action="/logs">
  <section><h2>When</h2><input type="datetime-local" name="timestamp" value="{local_value}" required/></section>
  <section><h2>Bristol Scale</h2>{bristol}</section>
  <section><h2>Color</h2>{colors}</section>
  <section><h2>Quantity</h2>{quantities}</section>
  <section><h2>Urgency</h2>{urgencies}</section>
  <section><h2>Smell</h2>{smells}</section>
  <section><h2>Pain Level</h2><input type="range" name="pain_level" min="0" max="10" value="{pain}"/></section>
  <section><h2>Flags</h2>
    <label class="option"><input type="checkbox" name="is_floating"{floating}/> Floating / Greasy / Oily</label>
    <label class="option"><input type="checkbox" name="has_blood"{blood}/> Visible Blood</label>
    <label class="option"><input type="checkbox" name="has_mucus"{mucus}/> Mucus</label>
  </section>
  <section><h2>Notes</h2><textarea name="notes" placeholder="Any food triggers? Stress? Medications?">{notes}</textarea></section>
  <button class="btn" type="submit">Save Entry</button>
</form>"#,
        colors = radio_group("color", &COLORS, &draft.color),
        quantities = radio_group("quantity", &QUANTITIES, &draft.quantity),
        urgencies = radio_group("urgency", &URGENCIES, &draft.urgency),
        smells = radio_group("smell", &SMELLS, &draft.smell),
        pain = draft.pain_level,
        floating = checked(draft.is_floating),
        blood = checked(draft.has_blood),
        mucus = checked(draft.has_mucus),
        notes = html_escape(&draft.notes),
    )
}

fn radio_group(name: &str, options: &[&str], selected: &str) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<label class="chip"><input type="radio" name="{name}" value="{value}"{checked}/> {value}</label>"#,
                value = html_escape(option),
                checked = checked(*option == selected),
            )
        })
        .collect()
}

fn checked(on: bool) -> &'static str {
    if on { " checked" } else { "" }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Gut Log</title>
  <style>
    :root {
      --bg: #fafaf9;
      --ink: #1c1917;
      --muted: #78716c;
      --accent: #d97706;
      --card: #ffffff;
      --line: #e7e5e4;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Helvetica Neue", sans-serif;
    }

    main {
      width: min(720px, 100%);
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      gap: 20px;
    }

    .bar {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    h2, h3 {
      margin: 0;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .btn {
      background: var(--ink);
      color: white;
      border: 0;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      text-decoration: none;
      cursor: pointer;
    }

    .btn.ghost {
      background: transparent;
      color: var(--ink);
      border: 1px solid var(--line);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
    }

    .stat, .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 16px;
    }

    .stat .label {
      display: block;
      font-size: 0.75rem;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 700;
    }

    .day {
      display: grid;
      gap: 10px;
    }

    .card {
      display: flex;
      gap: 14px;
      align-items: flex-start;
    }

    .score {
      width: 44px;
      height: 44px;
      border-radius: 12px;
      background: #fef3c7;
      color: var(--accent);
      display: grid;
      place-items: center;
      font-weight: 700;
    }

    .detail {
      flex: 1;
    }

    .meta {
      font-size: 0.9rem;
    }

    .badge {
      display: inline-block;
      margin: 6px 6px 0 0;
      padding: 2px 8px;
      border-radius: 6px;
      background: #f5f5f4;
      font-size: 0.75rem;
    }

    .notes {
      font-style: italic;
      color: var(--muted);
    }

    .delete {
      background: none;
      border: 0;
      color: var(--muted);
      cursor: pointer;
    }

    .entry {
      display: grid;
      gap: 18px;
    }

    .option, .chip {
      display: block;
      padding: 8px 0;
    }

    .chip {
      display: inline-block;
      margin-right: 12px;
    }

    textarea {
      width: 100%;
      min-height: 90px;
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }
  </style>
</head>
<body>
  <main>
{{BODY}}
  </main>
</body>
</html>
"#;
