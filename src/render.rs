//! HTML pages. Small enough that plain `format!` does the job; every piece of
//! user or catalog text goes through [`escape`].

use axum::http::StatusCode;

use crate::{
    assembler::{PlaylistRequest, Selection},
    mood::Mood,
    types::PlaylistRef,
    utils::DEFAULT_SONG_COUNT,
};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

pub fn login_page(auth_url: &str) -> String {
    layout(
        "moodlist",
        &format!(
            "<a href=\"{}\">Click here to log in with Spotify</a>",
            escape(auth_url)
        ),
    )
}

pub fn details_page() -> String {
    let options = Mood::all()
        .iter()
        .map(|mood| {
            format!(
                "<option value=\"{label}\">{title}</option>",
                label = mood.label(),
                title = mood.title()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    layout(
        "moodlist",
        &format!(
            r#"<h1>Build a playlist</h1>
<form method="post" action="/details">
<label>Mood <select name="mood">
{options}
</select></label>
<label>Artists (comma separated) <input type="text" name="artists" required></label>
<label>Number of songs <input type="number" name="song_no" min="1" value="{default}"></label>
<button type="submit">Create</button>
</form>
<p><a href="/logout">Log out</a></p>"#,
            options = options,
            default = DEFAULT_SONG_COUNT
        ),
    )
}

pub fn result_page(
    request: &PlaylistRequest,
    selection: &Selection,
    playlist: Option<&PlaylistRef>,
) -> String {
    let mut body = format!(
        "<h1>{} mood: {} of {} songs</h1>\n",
        escape(request.mood.title()),
        selection.tracks.len(),
        request.song_count
    );

    if selection.tracks.is_empty() {
        body.push_str("<p>No tracks matched this mood.</p>\n");
    } else {
        body.push_str("<ol>\n");
        for track in &selection.tracks {
            let artists = track.artist_names();
            if artists.is_empty() {
                body.push_str(&format!("<li>{}</li>\n", escape(&track.name)));
            } else {
                body.push_str(&format!(
                    "<li>{} &ndash; {}</li>\n",
                    escape(&track.name),
                    escape(&artists)
                ));
            }
        }
        body.push_str("</ol>\n");
    }

    body.push_str(&format!(
        "<p>{} candidates, {} matched, {} recommended.</p>\n",
        selection.candidate_count, selection.matched_count, selection.recommended_count
    ));

    if !selection.skipped_artists.is_empty() {
        let names = selection
            .skipped_artists
            .iter()
            .map(|name| escape(name))
            .collect::<Vec<_>>()
            .join(", ");
        body.push_str(&format!("<p>No artist found for: {}</p>\n", names));
    }

    if let Some(playlist) = playlist {
        match playlist.url() {
            Some(url) => body.push_str(&format!(
                "<p>Saved as <a href=\"{}\">{}</a>.</p>\n",
                escape(url),
                escape(&playlist.name)
            )),
            None => body.push_str(&format!("<p>Saved as {}.</p>\n", escape(&playlist.name))),
        }
    }

    body.push_str("<p><a href=\"/details\">Build another</a> | <a href=\"/logout\">Log out</a></p>");
    layout("moodlist", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    layout(
        "moodlist - error",
        &format!(
            "<h4>{}</h4>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>",
            escape(&status.to_string()),
            escape(message)
        ),
    )
}
