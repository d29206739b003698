use axum::response::Html;

/// GET /
/// The single page: job description, résumé upload, and an inline result area.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>CareerCraft ATS Analyzer</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; min-height: 10rem; }
  .warning { color: #9a5b00; }
  .error { color: #b00020; }
  pre { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }
</style>
</head>
<body>
<h1>CareerCraft</h1>
<p>Paste a job description, upload your résumé as a PDF, and get a match score,
missing keywords, a tailored summary, and suggestions.</p>
<form id="analyze-form" action="/api/v1/analyze" method="post" enctype="multipart/form-data">
  <label for="job_description">Job description</label>
  <textarea id="job_description" name="job_description"></textarea>
  <p><label for="resume">Résumé (PDF)</label>
  <input id="resume" name="resume" type="file" accept="application/pdf,.pdf"></p>
  <button type="submit">Submit for analysis</button>
  <p id="notice" role="status"></p>
</form>
<section id="result" hidden>
  <h2>Analysis result</h2>
  <p id="score"></p>
  <pre id="result-text"></pre>
</section>
<script>
const form = document.getElementById("analyze-form");
const notice = document.getElementById("notice");
const result = document.getElementById("result");
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  notice.className = "";
  notice.textContent = "Reading resume and running the analysis...";
  result.hidden = true;
  try {
    const response = await fetch(form.action, { method: "POST", body: new FormData(form) });
    const body = await response.json();
    if (!response.ok) {
      notice.className = "warning";
      notice.textContent = body.error ? body.error.message : "Request failed.";
      return;
    }
    notice.className = body.status === "failed" ? "error" : "";
    notice.textContent = body.diagnostic || "";
    document.getElementById("score").textContent =
      body.match_score === null ? "" : "Match: " + body.match_score + "%";
    document.getElementById("result-text").textContent = body.result;
    result.hidden = false;
  } catch (err) {
    notice.className = "error";
    notice.textContent = "Could not reach the server.";
  }
});
</script>
</body>
</html>
"#;
