//! Server-rendered HTML pages.

use super::markdown;
use crate::session::{ChatMessage, Sender, SessionSnapshot};

/// Product name shown in the header and page titles.
pub const BRAND: &str = "HeyA!";

const STYLES: &str = r"
:root { color-scheme: dark; }
* { box-sizing: border-box; }
body { margin: 0; min-height: 100vh; background: #1f2029; color: #fff; font-family: system-ui, sans-serif; }
.shell { max-width: 80rem; margin: 0 auto; padding: 1.5rem 2rem; }
.brand { display: flex; align-items: center; gap: .5rem; padding: 1rem 0; font-weight: 600; font-size: 1.25rem; color: #fff; text-decoration: none; }
.brand .mark { color: #f472b6; }
.hero { text-align: center; max-width: 56rem; margin: 4rem auto 0; padding: 0 2rem; }
.hero h1 { font-size: 2.75rem; line-height: 1.2; background: linear-gradient(to right, #f472b6, #c084fc); -webkit-background-clip: text; background-clip: text; color: transparent; }
.hero p { color: #9ca3af; font-size: 1.125rem; margin-bottom: 8rem; }
.search { position: relative; max-width: 42rem; margin: 0 auto; }
.search input { width: 100%; background: rgba(255,255,255,.1); color: #fff; border: 0; border-radius: 9999px; padding: 1rem 3rem 1rem 1.5rem; font-size: 1rem; outline: none; }
.search input:focus { box-shadow: 0 0 0 2px rgba(236,72,153,.5); }
.search button { position: absolute; right: 1rem; top: 50%; transform: translateY(-50%); background: none; border: 0; color: #9ca3af; cursor: pointer; font-size: 1.1rem; }
.chat-view { max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }
.toolbar { display: flex; align-items: center; justify-content: space-between; margin-bottom: 1.5rem; }
.toolbar form { display: inline; }
.back { color: #9ca3af; text-decoration: none; }
.back:hover { color: #fff; }
.pill { font-size: .875rem; background: none; border-radius: 9999px; padding: .25rem .75rem; cursor: pointer; text-decoration: none; }
.pill.danger { color: #f87171; border: 1px solid #ef4444; }
.pill.accent { color: #f472b6; border: 1px solid #ec4899; }
.panel { background: rgba(255,255,255,.1); border-radius: 1rem; padding: 2rem; min-height: 400px; display: flex; flex-direction: column; justify-content: space-between; }
.transcript { max-height: 400px; overflow-y: auto; display: flex; flex-direction: column; gap: 1rem; margin-bottom: 1rem; padding-right: .5rem; }
.message { display: flex; flex-direction: column; max-width: 80%; }
.message.user { align-self: flex-end; }
.message.bot { align-self: flex-start; }
.bubble { border-radius: .75rem; padding: .75rem 1rem; overflow-wrap: anywhere; }
.bubble > :first-child { margin-top: 0; }
.bubble > :last-child { margin-bottom: 0; }
.message.user .bubble { background: rgba(219,39,119,.2); color: #f9a8d4; }
.message.bot .bubble { background: rgba(255,255,255,.05); color: #d1d5db; }
.time { font-size: .75rem; color: #6b7280; margin-top: .25rem; text-align: right; }
.loading { color: #c084fc; }
.error { background: rgba(239,68,68,.1); color: #f87171; padding: 1rem; border-radius: .75rem; margin-bottom: 1rem; }
.composer { display: flex; gap: .5rem; border-top: 1px solid rgba(255,255,255,.2); padding-top: 1rem; }
.composer input { flex: 1; background: transparent; border: 1px solid #4b5563; color: #fff; border-radius: 9999px; padding: .5rem 1rem; outline: none; }
.composer button { border: 0; border-radius: 9999px; background: #ec4899; color: #fff; padding: .5rem 1rem; cursor: pointer; }
.composer :disabled { opacity: .5; cursor: not-allowed; }
footer { margin-top: 2.5rem; text-align: center; color: #9ca3af; }
footer p { font-size: .875rem; }
";

/// Wrap page content in the document shell.
///
/// `auto_refresh` makes the browser reload the page every second, which is
/// how the chat view follows a turn that is still in flight.
pub fn html_shell(title: &str, content: &str, auto_refresh: bool) -> String {
    let refresh = if auto_refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Intelligent conversations, always at your service">
    {refresh}
    <title>{title} - {BRAND}</title>
    <style>{STYLES}</style>
</head>
<body>
    <div class="shell">
        <header>
            <a href="/" class="brand"><span class="mark">&#9672;</span><span>{BRAND}</span></a>
        </header>

        <main id="app">
            {content}
        </main>

        <footer>
            <div>Made with <span class="mark">&#9889;</span> by Shubham Nayak</div>
            <p>&copy; 2025 {BRAND}. All rights reserved.</p>
        </footer>
    </div>
</body>
</html>"#
    )
}

/// Landing page content: hero copy and the question box.
pub fn landing_content() -> &'static str {
    r#"
    <section class="hero">
        <h1>HeyAI: Intelligent Conversations, Always at Your Service</h1>
        <p>Speak freely &mdash; our AI will craft the perfect response for you</p>

        <form class="search" method="get" action="/chat">
            <input type="text" name="q" placeholder="Ask HeyA! Freely..." required pattern=".*\S.*" autocomplete="off">
            <button type="submit" aria-label="Search">&#128269;</button>
        </form>
    </section>
    "#
}

/// Chat view content for the given session state.
pub fn chat_content(snapshot: &SessionSnapshot) -> String {
    let clear_button = if snapshot.messages.is_empty() || snapshot.loading {
        String::new()
    } else {
        r#"<form method="post" action="/chat/clear"><button type="submit" class="pill danger">Clear Chat</button></form>"#
            .to_string()
    };

    let mut transcript = String::new();
    for message in &snapshot.messages {
        transcript.push_str(&message_bubble(message));
    }
    if snapshot.loading {
        transcript.push_str(r#"<div class="loading">Generating response...</div>"#);
    }

    let error = snapshot
        .error
        .as_deref()
        .map(|e| format!(r#"<div class="error" role="alert">{}</div>"#, markdown::escape(e)))
        .unwrap_or_default();

    let disabled = if snapshot.loading { " disabled" } else { "" };
    let draft = markdown::escape(&snapshot.input);

    format!(
        r#"
    <div class="chat-view">
        <div class="toolbar">
            <a href="/" class="back">&larr; Back to Home</a>
            <div class="actions">
                {clear_button}
                <a href="/chat/export" class="pill accent">Export Chat as PDF</a>
            </div>
        </div>

        <div class="panel">
            <section class="transcript" aria-live="polite" aria-label="Chat messages">
                {transcript}
            </section>

            {error}

            <form class="composer" method="post" action="/chat/send">
                <input type="text" name="message" placeholder="Type your message..." value="{draft}" autocomplete="off" autofocus{disabled}>
                <button type="submit" aria-label="Send"{disabled}>Send</button>
            </form>
        </div>
    </div>
    "#
    )
}

fn message_bubble(message: &ChatMessage) -> String {
    let class = match message.sender {
        Sender::User => "user",
        Sender::Bot => "bot",
    };
    format!(
        r#"<div class="message {class}"><div class="bubble">{}</div><div class="time">{}</div></div>"#,
        markdown::render(&message.content),
        markdown::escape(&message.timestamp),
    )
}

/// Landing page.
pub fn landing_page() -> String {
    html_shell("Home", landing_content(), false)
}

/// Chat page; refreshes itself while a turn is in flight.
pub fn chat_page(snapshot: &SessionSnapshot) -> String {
    html_shell("Chat", &chat_content(snapshot), snapshot.loading)
}
