use crate::api::image_url;
use crate::draft::{ContributorChoice, RecordDraft};
use crate::form::{record_path, Navigation, RecordForm, Status, LIST_PATH};
use crate::list::RecordList;
use crate::models::Record;
use std::fmt::Write;

pub fn render_list(list: &RecordList, storage_endpoint: &str) -> String {
    let mut body = String::new();
    body.push_str(
        r#"<header class="bar">
      <h1>Records</h1>
      <a class="btn" href="/add">Add Record</a>
    </header>"#,
    );
    body.push_str(&render_status(&list.status));

    if list.records.is_empty() && !list.status.error {
        body.push_str(r#"<p class="hint">No records yet.</p>"#);
    }

    body.push_str(r#"<ul class="cards">"#);
    for record in &list.records {
        let _ = write!(
            body,
            r#"
      <li class="card" data-id="{id}">
        {thumb}
        <p><strong>Time:</strong> {time}</p>
        <p><strong>Contributor:</strong> {contributor}</p>
        <p><strong>Points:</strong> {points}</p>
        <p><strong>Note:</strong> {note}</p>
        <div class="row">{actions}</div>
      </li>"#,
            id = escape(record.id.as_str()),
            thumb = thumbnail(record, storage_endpoint),
            time = escape(&display_time(record)),
            contributor = escape(record.contributor_display()),
            points = record.points,
            note = escape(record.note.as_deref().unwrap_or("")),
            actions = record_actions(record),
        );
    }
    body.push_str("</ul>");

    body.push_str(
        r#"
    <table class="table">
      <thead>
        <tr><th>Time</th><th>Contributor</th><th>Points</th><th>Note</th><th>Image</th><th></th></tr>
      </thead>
      <tbody>"#,
    );
    for record in &list.records {
        let _ = write!(
            body,
            r#"
        <tr data-id="{id}"><td>{time}</td><td>{contributor}</td><td>{points}</td><td>{note}</td><td>{thumb}</td><td class="row">{actions}</td></tr>"#,
            id = escape(record.id.as_str()),
            time = escape(&display_time(record)),
            contributor = escape(record.contributor_display()),
            points = record.points,
            note = escape(record.note.as_deref().unwrap_or("")),
            thumb = thumbnail(record, storage_endpoint),
            actions = record_actions(record),
        );
    }
    body.push_str(
        r#"
      </tbody>
    </table>"#,
    );

    layout("Records", &body)
}

pub fn render_form_page(
    title: &str,
    action: &str,
    form: &RecordForm,
    draft: &RecordDraft,
    status: &Status,
    cancel: Option<&str>,
) -> String {
    let mut body = format!("<h1>{}</h1>", escape(title));
    body.push_str(&render_status(status));
    body.push_str(&render_form(action, form, draft, cancel));
    layout(title, &body)
}

/// Page shown after a successful submission; moves on to `navigation.to`.
pub fn render_done(title: &str, status: &Status, navigation: Navigation) -> String {
    let millis = navigation.after.as_millis();
    let to = escape(navigation.to);
    let body = format!(
        r#"<h1>{title}</h1>
    {status}
    <p class="hint"><a href="{to}">Back to records</a></p>
    <script>setTimeout(() => window.location.assign('{to}'), {millis});</script>"#,
        title = escape(title),
        status = render_status(status),
    );
    let head = format!(
        r#"<meta http-equiv="refresh" content="{};url={to}" />"#,
        millis.div_ceil(1000)
    );
    layout(title, &body).replacen("</head>", &format!("  {head}\n</head>"), 1)
}

/// Page for an edit view whose record could not be loaded.
pub fn render_failed(title: &str, status: &Status) -> String {
    let body = format!(
        r#"<h1>{}</h1>
    {}
    <p class="hint"><a href="{LIST_PATH}">Back to records</a></p>"#,
        escape(title),
        render_status(status)
    );
    layout(title, &body)
}

fn render_form(action: &str, form: &RecordForm, draft: &RecordDraft, cancel: Option<&str>) -> String {
    let (selected, typed) = match &draft.contributor {
        ContributorChoice::Existing(name) => (name.as_str(), ""),
        ContributorChoice::New(name) => ("", name.as_str()),
    };

    let mut options = String::from(r#"<option value="">Select Contributor</option>"#);
    for contributor in &form.contributors {
        let _ = write!(
            options,
            r#"<option value="{name}"{selected}>{name}</option>"#,
            name = escape(&contributor.name),
            selected = if contributor.name == selected { " selected" } else { "" },
        );
    }
    if !selected.is_empty() && !form.knows(draft) {
        let _ = write!(
            options,
            r#"<option value="{name}" selected>{name}</option>"#,
            name = escape(selected)
        );
    }

    let preview = match (&form.current_image, draft.image.stored_path()) {
        (Some(url), Some(path)) => format!(
            r#"<div class="preview">
        <img src="{}" alt="Current" />
        <p class="hint">Current image</p>
        <input type="hidden" name="current_image" value="{}" />
      </div>"#,
            escape(url),
            escape(path)
        ),
        _ => String::new(),
    };

    let submit = match cancel {
        Some(href) => format!(
            r#"<div class="row">
        <button class="btn" type="submit">{}</button>
        <a class="btn muted" href="{}">Cancel</a>
      </div>"#,
            escape(form.submit_label),
            escape(href)
        ),
        None => format!(
            r#"<button class="btn" type="submit">{}</button>"#,
            escape(form.submit_label)
        ),
    };

    format!(
        r#"<form class="record-form" method="post" action="{action}" enctype="multipart/form-data"
      onsubmit="this.querySelector('button[type=submit]').disabled = true;">
      <label>Time
        <input type="datetime-local" name="time" value="{time}" />
      </label>
      <fieldset class="contributor">
        <legend>Contributor</legend>
        <label><input type="radio" name="contributor_mode" value="existing"{existing_checked} /> Existing</label>
        <label><input type="radio" name="contributor_mode" value="new"{new_checked} /> New</label>
        <select name="contributor_name">{options}</select>
        <input type="text" name="new_contributor_name" placeholder="New contributor name" value="{typed}" />
      </fieldset>
      <label>Points
        <input type="range" name="points" min="1" max="5" step="1" value="{points}"
          oninput="this.nextElementSibling.value = this.value" />
        <output>{points}</output>
      </label>
      <textarea name="note" placeholder="Note">{note}</textarea>
      {preview}
      <input type="file" name="image" accept="image/*" />
      {submit}
    </form>"#,
        action = escape(action),
        time = escape(&draft.time),
        existing_checked = if draft.contributor.is_new() { "" } else { " checked" },
        new_checked = if draft.contributor.is_new() { " checked" } else { "" },
        typed = escape(typed),
        points = draft.points,
        note = escape(&draft.note),
    )
}

fn render_status(status: &Status) -> String {
    if status.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="status" data-type="{}">{}</div>"#,
        if status.error { "error" } else { "ok" },
        escape(&status.message)
    )
}

fn record_actions(record: &Record) -> String {
    format!(
        r#"<a class="btn small" href="{edit}">Edit</a>
        <form method="post" action="{delete}" onsubmit="return confirm('Delete this record?');">
          <button class="btn small danger" type="submit">Delete</button>
        </form>"#,
        edit = escape(&record_path("edit", &record.id)),
        delete = escape(&record_path("delete", &record.id)),
    )
}

fn thumbnail(record: &Record, storage_endpoint: &str) -> String {
    match record.stored_image() {
        Some(path) => format!(
            r#"<img class="thumb" src="{}" alt="Record image" />"#,
            escape(&image_url(storage_endpoint, path))
        ),
        None => String::new(),
    }
}

fn display_time(record: &Record) -> String {
    record
        .record_time
        .as_deref()
        .map(|raw| crate::draft::to_form_time(raw).replacen('T', " ", 1))
        .unwrap_or_default()
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{BODY}}", body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Housework</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --accent: #2f6fde;
      --danger: #c63b2b;
      --muted: #6b645d;
      --card: #ffffff;
      --line: rgba(43, 42, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .bar,
    .row {
      display: flex;
      gap: 10px;
      align-items: center;
      justify-content: space-between;
    }

    .row form {
      margin: 0;
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 6px;
      padding: 10px 16px;
      background: var(--accent);
      color: white;
      font-size: 1rem;
      text-decoration: none;
      cursor: pointer;
    }

    .btn:disabled {
      opacity: 0.6;
      cursor: progress;
    }

    .btn.small {
      padding: 6px 10px;
      font-size: 0.9rem;
    }

    .btn.muted {
      background: var(--muted);
    }

    .btn.danger {
      background: var(--danger);
    }

    .status {
      padding: 10px 12px;
      border-radius: 6px;
      background: #e3f3e8;
      color: #2d7a4b;
    }

    .status[data-type="error"] {
      background: #fbe4e1;
      color: var(--danger);
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .cards {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 14px;
    }

    .card p {
      margin: 4px 0;
    }

    .thumb {
      max-width: 120px;
      border-radius: 4px;
    }

    .table {
      display: none;
      width: 100%;
      border-collapse: collapse;
      background: var(--card);
    }

    .table th,
    .table td {
      padding: 8px 10px;
      border-bottom: 1px solid var(--line);
      text-align: left;
      vertical-align: top;
    }

    .record-form {
      display: grid;
      gap: 14px;
    }

    .record-form label,
    .record-form fieldset {
      display: grid;
      gap: 6px;
    }

    .record-form input[type="datetime-local"],
    .record-form input[type="text"],
    .record-form select,
    .record-form textarea {
      border: 1px solid var(--line);
      border-radius: 6px;
      padding: 8px;
      font: inherit;
    }

    .contributor:has(input[value="new"]:checked) select,
    .contributor:has(input[value="existing"]:checked) input[type="text"] {
      display: none;
    }

    .preview img {
      max-width: 320px;
    }

    @media (min-width: 768px) {
      .cards {
        display: none;
      }
      .table {
        display: table;
      }
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
