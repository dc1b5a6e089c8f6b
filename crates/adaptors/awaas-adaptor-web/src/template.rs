//! Embedded chat page
//!
//! One self-contained HTML page: transcript, welcome panel, thinking
//! indicator, source panels, language/model selectors, theme toggle,
//! text-to-speech, and a document upload control. The page JS consumes
//! `/api/chat` with the same frame semantics as the Rust stream consumer,
//! and the option tables and locale map are injected from the core crate so
//! the two sides cannot drift.

use awaas_core::{
    locale_for, LANGUAGES, MODELS, DEFAULT_LOCALE, DEFAULT_MODEL,
};

/// Render the chat page with the option tables substituted in
pub fn render_page() -> String {
    let languages_json = serde_json::to_string(LANGUAGES).unwrap_or_else(|_| "[]".to_string());
    let models_json = serde_json::to_string(MODELS).unwrap_or_else(|_| "[]".to_string());
    let locales_json = serde_json::to_string(
        &LANGUAGES
            .iter()
            .map(|l| (l.code, locale_for(l.code)))
            .collect::<std::collections::BTreeMap<_, _>>(),
    )
    .unwrap_or_else(|_| "{}".to_string());

    PAGE_TEMPLATE
        .replace("{LANGUAGES_JSON}", &languages_json)
        .replace("{MODELS_JSON}", &models_json)
        .replace("{LOCALES_JSON}", &locales_json)
        .replace("{DEFAULT_LOCALE}", DEFAULT_LOCALE)
        .replace("{DEFAULT_MODEL}", DEFAULT_MODEL)
}

const PAGE_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>PMAY Chatbot</title>
  <style>
    :root {
      --bg: #f8fafc;
      --card: #ffffff;
      --primary: #f97316;
      --secondary: #16a34a;
      --text: #1e293b;
      --muted: #64748b;
      --border: rgba(0,0,0,0.08);
      --hover: #e2e8f0;
      --danger: #ef4444;
    }
    html.dark {
      --bg: #0f172a;
      --card: #111827;
      --text: #e5e7eb;
      --muted: #94a3b8;
      --border: rgba(255,255,255,0.1);
      --hover: #1f2937;
    }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: Inter, system-ui, -apple-system, Segoe UI, Roboto, sans-serif;
      background: var(--bg);
      color: var(--text);
      min-height: 100vh;
      display: flex;
      flex-direction: column;
    }
    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 14px 20px;
      background: var(--card);
      border-bottom: 1px solid var(--border);
      flex-wrap: wrap;
    }
    .brand { display: flex; align-items: center; gap: 10px; font-weight: 700; font-size: 17px; }
    .brand-dot {
      width: 10px; height: 10px; border-radius: 50%;
      background: var(--secondary); box-shadow: 0 0 10px var(--secondary);
    }
    .controls { display: flex; gap: 10px; align-items: center; flex-wrap: wrap; }
    select, .icon-btn, .upload-btn {
      background: var(--bg);
      color: var(--text);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 8px 10px;
      font-size: 13px;
      cursor: pointer;
    }
    .chat {
      flex: 1;
      overflow-y: auto;
      padding: 24px;
      display: flex;
      flex-direction: column;
      gap: 14px;
      max-width: 860px;
      width: 100%;
      margin: 0 auto;
    }
    .welcome {
      margin: auto;
      text-align: center;
      padding: 48px 32px;
      max-width: 480px;
    }
    .welcome h1 { font-size: 22px; margin-bottom: 10px; }
    .welcome p { color: var(--muted); font-size: 14px; line-height: 1.5; }
    .welcome .footnote { margin-top: 14px; font-size: 12px; }
    .error-panel {
      margin: auto;
      text-align: center;
      padding: 40px 32px;
    }
    .error-panel h2 { color: var(--danger); margin-bottom: 8px; }
    .error-panel p { color: var(--muted); font-size: 14px; margin-bottom: 16px; }
    .error-panel button {
      padding: 10px 20px; border: 0; border-radius: 8px;
      background: var(--primary); color: white; font-weight: 600; cursor: pointer;
    }
    .spinner {
      margin: auto;
      width: 36px; height: 36px;
      border: 4px solid var(--hover);
      border-top-color: var(--primary);
      border-radius: 50%;
      animation: spin 0.8s linear infinite;
    }
    @keyframes spin { to { transform: rotate(360deg); } }
    .msg { display: flex; gap: 10px; max-width: 85%; }
    .msg.user { margin-left: auto; flex-direction: row-reverse; }
    .avatar {
      width: 32px; height: 32px; border-radius: 8px; flex-shrink: 0;
      display: flex; align-items: center; justify-content: center;
      font-size: 13px; font-weight: 600; color: white;
    }
    .msg.assistant .avatar { background: var(--secondary); }
    .msg.user .avatar { background: var(--primary); }
    .bubble {
      padding: 10px 14px;
      border-radius: 12px;
      background: var(--card);
      border: 1px solid var(--border);
      font-size: 14px;
      line-height: 1.5;
      overflow-wrap: anywhere;
    }
    .bubble code {
      background: var(--hover);
      border-radius: 4px;
      padding: 1px 5px;
      font-size: 13px;
    }
    .msg-actions { margin-top: 6px; }
    .speak-btn {
      border: 1px solid var(--border); background: transparent; color: var(--muted);
      border-radius: 6px; padding: 3px 8px; font-size: 12px; cursor: pointer;
    }
    .speak-btn.playing { color: var(--primary); border-color: var(--primary); }
    .sources { margin-top: 8px; }
    .sources-toggle {
      border: 0; background: transparent; color: var(--primary);
      font-size: 12px; font-weight: 600; cursor: pointer; padding: 0;
    }
    .source-list { display: none; margin-top: 8px; flex-direction: column; gap: 8px; }
    .source-list.expanded { display: flex; }
    .source-item {
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 8px 10px;
      font-size: 12px;
      background: var(--bg);
    }
    .source-head { display: flex; justify-content: space-between; gap: 8px; margin-bottom: 4px; }
    .source-name { font-weight: 600; }
    .source-score { color: var(--muted); }
    .source-text { color: var(--muted); line-height: 1.4; }
    .thinking { display: flex; gap: 10px; }
    .thinking .dots { display: flex; gap: 4px; align-items: center; padding: 12px 14px; }
    .thinking .dots span {
      width: 7px; height: 7px; border-radius: 50%; background: var(--muted);
      animation: blink 1.2s infinite;
    }
    .thinking .dots span:nth-child(2) { animation-delay: .2s; }
    .thinking .dots span:nth-child(3) { animation-delay: .4s; }
    @keyframes blink { 0%, 80%, 100% { opacity: .2; } 40% { opacity: 1; } }
    .composer {
      padding: 14px 20px 20px;
      background: var(--card);
      border-top: 1px solid var(--border);
    }
    .composer-row {
      display: flex; gap: 10px;
      max-width: 860px; margin: 0 auto;
    }
    .composer input[type="text"] {
      flex: 1;
      padding: 12px 14px;
      border-radius: 10px;
      border: 1px solid var(--border);
      background: var(--bg);
      color: var(--text);
      font-size: 14px;
      outline: none;
    }
    .composer input[type="text"]:focus { border-color: var(--primary); }
    .send-btn {
      padding: 12px 22px;
      border-radius: 10px;
      border: 0;
      background: var(--primary);
      color: white;
      font-weight: 600;
      cursor: pointer;
    }
    .send-btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .upload-note { max-width: 860px; margin: 8px auto 0; font-size: 12px; color: var(--muted); }
  </style>
</head>
<body>
  <header>
    <div class="brand"><div class="brand-dot"></div> PMAY Chatbot</div>
    <div class="controls">
      <select id="language" title="Language"></select>
      <select id="model" title="Model"></select>
      <button id="themeToggle" class="icon-btn" title="Toggle theme">&#9681;</button>
      <label class="upload-btn" for="file">Upload PDF</label>
      <input id="file" type="file" accept=".pdf" style="display:none" />
    </div>
  </header>
  <div class="chat" id="chat"></div>
  <div class="composer">
    <div class="composer-row">
      <input id="input" type="text" placeholder="Ask about PMAY scheme..." autocomplete="off" />
      <button id="send" class="send-btn">Send</button>
    </div>
    <div class="upload-note" id="uploadNote"></div>
  </div>
  <script>
    const LANGUAGES = {LANGUAGES_JSON};
    const MODELS = {MODELS_JSON};
    const LOCALES = {LOCALES_JSON};
    const DEFAULT_LOCALE = '{DEFAULT_LOCALE}';
    const DEFAULT_MODEL = '{DEFAULT_MODEL}';

    const chatEl = document.getElementById('chat');
    const inputEl = document.getElementById('input');
    const sendBtn = document.getElementById('send');
    const uploadNote = document.getElementById('uploadNote');

    // transcript state, transient and discarded on reload
    let messages = [];
    let loading = false;
    let streamingStarted = false;
    let error = null;
    const expanded = {};
    let speakingId = null;

    // selectors
    const langSelect = document.getElementById('language');
    for (const l of LANGUAGES) {
      const opt = document.createElement('option');
      opt.value = l.code;
      opt.textContent = l.name + ' (' + l.nativeName + ')';
      langSelect.appendChild(opt);
    }
    const modelSelect = document.getElementById('model');
    for (const m of MODELS) {
      const opt = document.createElement('option');
      opt.value = m.id;
      opt.textContent = m.label + ' - ' + m.note;
      modelSelect.appendChild(opt);
    }
    modelSelect.value = DEFAULT_MODEL;

    // theme, persisted under the key `theme`
    function applyTheme(t) {
      const dark = t === 'dark' ||
        (t === 'system' && window.matchMedia('(prefers-color-scheme: dark)').matches);
      document.documentElement.classList.toggle('dark', dark);
    }
    let theme = localStorage.getItem('theme') || 'system';
    applyTheme(theme);
    document.getElementById('themeToggle').addEventListener('click', () => {
      theme = document.documentElement.classList.contains('dark') ? 'light' : 'dark';
      localStorage.setItem('theme', theme);
      applyTheme(theme);
    });

    function escapeHtml(s) {
      return s.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;').replace(/'/g, '&#39;');
    }

    // safe markup only: input is escaped before any formatting is applied
    function formatMarkdown(s) {
      let t = escapeHtml(s);
      t = t.replace(/\*\*([^*]+)\*\*/g, '<strong>$1</strong>');
      t = t.replace(/\*([^*]+)\*/g, '<em>$1</em>');
      t = t.replace(/`([^`]+)`/g, '<code>$1</code>');
      t = t.replace(/\n/g, '<br>');
      return t;
    }

    function sourceName(meta) {
      return (meta && meta.source) ? meta.source : 'Document';
    }

    function render() {
      chatEl.innerHTML = '';
      if (error) {
        const panel = document.createElement('div');
        panel.className = 'error-panel';
        panel.innerHTML = '<h2>Oops! Something went wrong.</h2><p>' +
          escapeHtml(error) + '</p>';
        const btn = document.createElement('button');
        btn.textContent = 'Refresh';
        btn.addEventListener('click', () => window.location.reload());
        panel.appendChild(btn);
        chatEl.appendChild(panel);
        return;
      }
      if (messages.length === 0 && !loading) {
        const w = document.createElement('div');
        w.className = 'welcome';
        w.innerHTML = '<h1>PMAY Chatbot</h1>' +
          '<p>Ask questions about the Pradhan Mantri Awas Yojana (PMAY) scheme ' +
          'and get accurate, context-aware responses.</p>' +
          '<p class="footnote">Powered by RAG with cross-encoder re-ranking</p>';
        chatEl.appendChild(w);
        return;
      }
      if (messages.length === 0) {
        const s = document.createElement('div');
        s.className = 'spinner';
        chatEl.appendChild(s);
        return;
      }
      for (const m of messages) {
        chatEl.appendChild(renderMessage(m));
      }
      if (loading && !streamingStarted) {
        const t = document.createElement('div');
        t.className = 'msg assistant thinking';
        t.innerHTML = '<div class="avatar">A</div>' +
          '<div class="bubble"><div class="dots"><span></span><span></span><span></span></div></div>';
        chatEl.appendChild(t);
      }
      chatEl.scrollTop = chatEl.scrollHeight;
    }

    function renderMessage(m) {
      const row = document.createElement('div');
      row.className = 'msg ' + m.role;
      const avatar = document.createElement('div');
      avatar.className = 'avatar';
      avatar.textContent = m.role === 'user' ? 'U' : 'A';
      const body = document.createElement('div');
      const bubble = document.createElement('div');
      bubble.className = 'bubble';
      bubble.innerHTML = formatMarkdown(m.content);
      body.appendChild(bubble);
      if (m.role === 'assistant' && m.content) {
        const actions = document.createElement('div');
        actions.className = 'msg-actions';
        const speak = document.createElement('button');
        speak.className = 'speak-btn' + (speakingId === m.id ? ' playing' : '');
        speak.textContent = speakingId === m.id ? 'Stop speaking' : 'Read aloud';
        speak.addEventListener('click', () => toggleSpeech(m));
        actions.appendChild(speak);
        body.appendChild(actions);
      }
      if (m.role === 'assistant' && m.sources && m.sources.length > 0) {
        body.appendChild(renderSources(m));
      }
      row.appendChild(avatar);
      row.appendChild(body);
      return row;
    }

    function renderSources(m) {
      const n = m.sources.length;
      const wrap = document.createElement('div');
      wrap.className = 'sources';
      const isOpen = !!expanded[m.id];
      const toggle = document.createElement('button');
      toggle.className = 'sources-toggle';
      toggle.textContent = (isOpen ? 'Hide ' : 'Show ') + n + ' source' + (n > 1 ? 's' : '');
      toggle.addEventListener('click', () => {
        expanded[m.id] = !expanded[m.id];
        render();
      });
      wrap.appendChild(toggle);
      const list = document.createElement('div');
      list.className = 'source-list' + (isOpen ? ' expanded' : '');
      for (const doc of m.sources) {
        const item = document.createElement('div');
        item.className = 'source-item';
        item.innerHTML = '<div class="source-head">' +
          '<span class="source-name">' + escapeHtml(sourceName(doc.metadata)) + '</span>' +
          '<span class="source-score">Relevance: ' + Math.round(doc.score * 100) + '%</span>' +
          '</div>' +
          '<div class="source-text">' + escapeHtml(doc.text) + '</div>';
        list.appendChild(item);
      }
      wrap.appendChild(list);
      return wrap;
    }

    // --- text to speech ---
    function prepareSpeechText(raw) {
      return raw.replace(/[#*`]/g, '').replace(/<[^>]*>/g, '').replace(/\n+/g, ' ').trim();
    }

    function toggleSpeech(m) {
      if (!('speechSynthesis' in window)) {
        alert('Text-to-speech is not supported in your browser');
        return;
      }
      if (speakingId === m.id) {
        window.speechSynthesis.cancel();
        speakingId = null;
        render();
        return;
      }
      window.speechSynthesis.cancel();
      const utterance = new SpeechSynthesisUtterance(prepareSpeechText(m.content));
      utterance.lang = LOCALES[langSelect.value] || DEFAULT_LOCALE;
      utterance.rate = 0.9;
      utterance.pitch = 1;
      utterance.volume = 0.8;
      utterance.onend = () => { speakingId = null; render(); };
      utterance.onerror = () => {
        speakingId = null;
        render();
        alert('Error occurred during text-to-speech');
      };
      speakingId = m.id;
      render();
      window.speechSynthesis.speak(utterance);
    }

    // --- chat stream ---
    function upsertAssistant(id, content, sources) {
      const existing = messages.find(m => m.id === id);
      if (existing) {
        existing.content = content;
        existing.sources = sources;
      } else {
        messages.push({ id: id, role: 'assistant', content: content, sources: sources });
      }
    }

    async function send() {
      const text = inputEl.value.trim();
      if (!text || loading) return;
      inputEl.value = '';
      messages.push({ id: 'user-' + Date.now(), role: 'user', content: text });
      loading = true;
      streamingStarted = false;
      error = null;
      sendBtn.disabled = true;
      render();

      // reserved id, fixed at submission and reused for every partial update
      const responseId = 'ai-response-' + Date.now();
      let accumulated = '';
      let sources = undefined;

      try {
        const res = await fetch('/api/chat', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ messages: messages }),
        });
        if (!res.ok || !res.body) {
          throw new Error('Request failed with status ' + res.status);
        }
        const reader = res.body.getReader();
        const decoder = new TextDecoder();
        let buffer = '';
        while (true) {
          const { done, value } = await reader.read();
          if (done) break;
          buffer += decoder.decode(value, { stream: true });
          const parts = buffer.split('\n\n');
          buffer = parts.pop();
          for (const part of parts) {
            if (!part.startsWith('data: ')) continue;
            let data;
            try {
              data = JSON.parse(part.slice(6));
            } catch (e) {
              console.error('Error parsing SSE message:', e);
              continue;
            }
            if (data.type === 'text' && data.content) {
              accumulated += data.content;
              streamingStarted = true;
              upsertAssistant(responseId, accumulated, sources);
              render();
            } else if (data.type === 'sources' && data.sources) {
              sources = data.sources;
              upsertAssistant(responseId, accumulated, sources);
              render();
            }
          }
        }
      } catch (e) {
        console.error('Chat stream failed:', e);
        error = String(e && e.message ? e.message : e);
        messages.push({
          id: 'error-' + Date.now(),
          role: 'assistant',
          content: 'I apologize, but I encountered an error while processing your request. Please try again.',
        });
      } finally {
        loading = false;
        sendBtn.disabled = false;
        render();
      }
    }

    sendBtn.addEventListener('click', send);
    inputEl.addEventListener('keydown', (e) => { if (e.key === 'Enter') send(); });

    // --- upload ---
    document.getElementById('file').addEventListener('change', async (e) => {
      const file = e.target.files[0];
      if (!file) return;
      uploadNote.textContent = 'Uploading ' + file.name + '...';
      const form = new FormData();
      form.append('file', file);
      try {
        const res = await fetch('/api/upload', { method: 'POST', body: form });
        const body = await res.json();
        uploadNote.textContent = res.ok
          ? body.message + ' (' + body.chunks_added + ' chunks)'
          : (body.error || 'Upload failed');
      } catch (err) {
        uploadNote.textContent = 'Upload failed';
      }
      e.target.value = '';
    });

    render();
  </script>
</body>
</html>
"##;
