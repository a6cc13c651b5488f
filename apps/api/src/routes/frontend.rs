//! Form frontend served at `/`.
//!
//! The page asks for the secret once, keeps it in `sessionStorage`, and sends
//! it in the `x-blog-agent-secret` header with every generation call.

use axum::response::Html;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="ko">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Blog Agent</title>
<style>
  body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
  label { display: block; margin-top: .75rem; font-weight: 600; }
  input, textarea, select { width: 100%; box-sizing: border-box; padding: .4rem; }
  textarea { min-height: 6rem; }
  button { margin-top: 1rem; padding: .5rem 1.5rem; }
  nav button[aria-pressed="true"] { font-weight: 700; }
  .hidden { display: none; }
  .warning { color: #b00020; }
  pre { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }
</style>
</head>
<body>
<h1>Blog Agent</h1>

<section id="auth">
  <label for="secret">Secret</label>
  <input id="secret" type="password" autocomplete="off">
  <button id="enter">Enter</button>
  <p id="auth-warning" class="warning"></p>
</section>

<section id="app" class="hidden">
  <nav>
    <button data-tab="post" aria-pressed="true">Blog post</button>
    <button data-tab="review" aria-pressed="false">Product review</button>
  </nav>

  <form id="post" data-endpoint="/api/v1/posts">
    <label>Enter title <input name="title" required></label>
    <label>Enter review <textarea name="review" required></textarea></label>
    <label>Enter post's length <input name="max_length" type="number" min="500" max="2000" value="1000" required></label>
    <label>Enter comma-separated keywords. Example) 맛집,서울 <input name="keywords" required></label>
    <label>Enter comma-separated foods. Example) 고기,냉면 <input name="foods" required></label>
    <label>Enter restaurant (deprecated) <input name="restaurant"></label>
    <button type="submit">Write!</button>
  </form>

  <form id="review" data-endpoint="/api/v1/reviews" class="hidden">
    <label>Category <input name="category" required></label>
    <label>Product <input name="product" required></label>
    <label>Score <input name="score" type="number" min="0" max="5" value="5" required></label>
    <label>Review's length <input name="max_length" type="number" min="500" max="2000" value="1000" required></label>
    <label>Positive review <textarea name="positive_review" required></textarea></label>
    <label>Negative review <textarea name="negative_review" required></textarea></label>
    <label><input name="sponsored" type="checkbox" style="width:auto"> Sponsored</label>
    <label>Purchased date <input name="purchased_date" type="date" required></label>
    <label>Arrived date <input name="arrived_date" type="date" required></label>
    <label>Packaging state <input name="packaging_state" required></label>
    <button type="submit">Write!</button>
  </form>

  <p id="warning" class="warning"></p>
  <pre id="result" class="hidden"></pre>
</section>

<script>
const SECRET_KEY = "blog-agent-secret";
const $ = (id) => document.getElementById(id);

function unlock() {
  $("auth").classList.add("hidden");
  $("app").classList.remove("hidden");
}

async function enter() {
  const secret = $("secret").value;
  const res = await fetch("/api/v1/auth", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ secret }),
  });
  if (res.status === 204) {
    sessionStorage.setItem(SECRET_KEY, secret);
    unlock();
  } else {
    $("auth-warning").textContent = "Invalid secret. Try other secrets";
  }
}

function payload(form) {
  const body = {};
  for (const el of form.elements) {
    if (!el.name) continue;
    if (el.type === "checkbox") body[el.name] = el.checked;
    else if (el.type === "number") body[el.name] = Number(el.value);
    else body[el.name] = el.value;
  }
  return body;
}

async function submit(event) {
  event.preventDefault();
  const form = event.target;
  $("warning").textContent = "";
  $("result").classList.add("hidden");
  form.querySelector("button").disabled = true;
  try {
    const res = await fetch(form.dataset.endpoint, {
      method: "POST",
      headers: {
        "content-type": "application/json",
        "x-blog-agent-secret": sessionStorage.getItem(SECRET_KEY) || "",
      },
      body: JSON.stringify(payload(form)),
    });
    const data = await res.json();
    if (res.status === 401) {
      sessionStorage.removeItem(SECRET_KEY);
      location.reload();
      return;
    }
    if (!res.ok) {
      $("warning").textContent = data.error ? data.error.message : res.statusText;
      return;
    }
    $("result").textContent = data.markdown;
    $("result").classList.remove("hidden");
  } catch (err) {
    $("warning").textContent = String(err);
  } finally {
    form.querySelector("button").disabled = false;
  }
}

document.querySelectorAll("nav button").forEach((tab) => {
  tab.addEventListener("click", () => {
    document.querySelectorAll("nav button").forEach((b) => b.setAttribute("aria-pressed", b === tab));
    $("post").classList.toggle("hidden", tab.dataset.tab !== "post");
    $("review").classList.toggle("hidden", tab.dataset.tab !== "review");
  });
});
$("enter").addEventListener("click", enter);
$("post").addEventListener("submit", submit);
$("review").addEventListener("submit", submit);
if (sessionStorage.getItem(SECRET_KEY)) unlock();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_posts_to_api_routes() {
        assert!(INDEX_HTML.contains(r#"data-endpoint="/api/v1/posts""#));
        assert!(INDEX_HTML.contains(r#"data-endpoint="/api/v1/reviews""#));
        assert!(INDEX_HTML.contains("x-blog-agent-secret"));
    }
}
