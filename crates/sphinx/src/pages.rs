//! HTML bodies for the protected entry point.

use std::path::Path;

/// Served once the visitor has solved a riddle
const FALLBACK_INDEX: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Welcome</title></head>
<body>
  <main>
    <h1>Welcome in</h1>
    <p>You solved the riddle. Leave a note below.</p>
    <form id="feedback">
      <input name="name" placeholder="Name">
      <input name="email" placeholder="Email">
      <textarea name="message" placeholder="Message" required></textarea>
      <button type="submit">Send</button>
    </form>
    <p id="status"></p>
  </main>
  <script>
    document.getElementById('feedback').addEventListener('submit', async (e) => {
      e.preventDefault();
      const body = Object.fromEntries(new FormData(e.target));
      const res = await fetch('/api/feedback', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      const data = await res.json();
      document.getElementById('status').textContent = data.ok ? 'Thanks!' : 'Please write a message.';
    });
  </script>
</body>
</html>
"#;

/// Served while the session is locked
const FALLBACK_RIDDLE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Riddle me this</title></head>
<body>
  <main>
    <h1>Answer to enter</h1>
    <p><small id="category"></small></p>
    <p id="question">Loading...</p>
    <form id="solve">
      <input name="answer" autocomplete="off" autofocus>
      <button type="submit">Solve</button>
      <button type="button" id="another">Another one</button>
    </form>
    <p id="status"></p>
  </main>
  <script>
    async function next() {
      const data = await (await fetch('/riddle')).json();
      document.getElementById('question').textContent = data.question;
      document.getElementById('category').textContent = data.category;
      document.getElementById('status').textContent = '';
    }
    document.getElementById('another').addEventListener('click', next);
    document.getElementById('solve').addEventListener('submit', async (e) => {
      e.preventDefault();
      const answer = new FormData(e.target).get('answer');
      const res = await fetch('/solve', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ answer }),
      });
      const data = await res.json();
      if (data.ok) { location.reload(); }
      else { document.getElementById('status').textContent = 'Not quite, try again.'; }
    });
    next();
  </script>
</body>
</html>
"#;

/// The two bodies `GET /` can serve
#[derive(Debug, Clone)]
pub struct Pages {
    pub index: String,
    pub riddle: String,
}

impl Pages {
    /// Read `index.html` and `riddle.html` from `public_dir`, falling back to
    /// the built-in pages for whichever is missing.
    pub fn load(public_dir: &Path) -> Self {
        Self {
            index: read_or(public_dir, "index.html", FALLBACK_INDEX),
            riddle: read_or(public_dir, "riddle.html", FALLBACK_RIDDLE),
        }
    }

    pub fn builtin() -> Self {
        Self {
            index: FALLBACK_INDEX.to_string(),
            riddle: FALLBACK_RIDDLE.to_string(),
        }
    }
}

fn read_or(dir: &Path, name: &str, fallback: &str) -> String {
    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(body) => {
            tracing::debug!(path = %path.display(), "Loaded page");
            body
        }
        Err(_) => {
            tracing::debug!(path = %path.display(), "Page not found, using built-in");
            fallback.to_string()
        }
    }
}
