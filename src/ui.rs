use crate::models::TOTAL_DAYS;

pub fn render_index(training_title: &str) -> String {
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(training_title))
        .replace("{{TOTAL_DAYS}}", &TOTAL_DAYS.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef2fb;
      --bg-2: #c7d2fe;
      --ink: #1f2937;
      --accent: #4f46e5;
      --present: #22c55e;
      --absent: #ef4444;
      --late: #eab308;
      --excused: #3b82f6;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(49, 46, 129, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f5f7ff 60%, #ffffff 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 18px 96px;
    }

    .app {
      width: min(1200px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
      margin: 0;
      cursor: text;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #6b7280;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(79, 70, 229, 0.08);
      border-radius: 999px;
    }

    .tab {
      border: none;
      background: transparent;
      border-radius: 999px;
      padding: 8px 16px;
      font: inherit;
      font-weight: 600;
      color: #4b5563;
      cursor: pointer;
    }

    .tab.active {
      background: white;
      color: var(--accent);
      box-shadow: 0 8px 16px rgba(49, 46, 129, 0.12);
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #9ca3af;
    }

    .stat .value {
      display: block;
      font-size: 1.8rem;
      font-weight: 600;
      margin-top: 6px;
    }

    .view {
      display: none;
    }

    .view.active {
      display: grid;
      gap: 24px;
    }

    #chart {
      width: 100%;
      height: 280px;
    }

    .grid-wrap {
      overflow-x: auto;
    }

    table {
      border-collapse: collapse;
      width: 100%;
      font-size: 0.9rem;
    }

    th, td {
      border-bottom: 1px solid #e5e7eb;
      padding: 6px 8px;
      text-align: left;
      white-space: nowrap;
    }

    td.cell {
      width: 32px;
      text-align: center;
      font-weight: 600;
      cursor: pointer;
      user-select: none;
    }

    td.cell[data-status="P"] { background: #dcfce7; color: #166534; }
    td.cell[data-status="A"] { background: #fee2e2; color: #991b1b; }
    td.cell[data-status="L"] { background: #fef9c3; color: #854d0e; }
    td.cell[data-status="E"] { background: #dbeafe; color: #1e40af; }

    form {
      display: grid;
      gap: 12px;
    }

    input {
      font: inherit;
      padding: 10px 12px;
      border: 1px solid #d1d5db;
      border-radius: 10px;
    }

    button.primary, a.primary {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
      text-decoration: none;
      text-align: center;
    }

    button.danger {
      border: none;
      background: transparent;
      color: var(--absent);
      font: inherit;
      cursor: pointer;
    }

    .status {
      min-height: 1.2em;
      color: #6b7280;
    }

    .status[data-type="error"] { color: #b91c1c; }
    .status[data-type="ok"] { color: #15803d; }

    .chat {
      position: fixed;
      right: 20px;
      bottom: 20px;
      width: min(360px, calc(100% - 40px));
      display: grid;
      gap: 10px;
    }

    .chat .log {
      max-height: 320px;
      overflow-y: auto;
      display: grid;
      gap: 8px;
    }

    .msg {
      padding: 8px 12px;
      border-radius: 14px;
      white-space: pre-wrap;
    }

    .msg.user { background: var(--accent); color: white; justify-self: end; }
    .msg.bot { background: #f3f4f6; justify-self: start; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1 id="title" title="Click to rename">{{TITLE}}</h1>
        <p class="subtitle">{{TOTAL_DAYS}}-day attendance tracker</p>
      </div>
      <nav class="tabs" role="tablist">
        <button class="tab active" type="button" data-tab="dashboard">Dashboard</button>
        <button class="tab" type="button" data-tab="students">Students</button>
        <button class="tab" type="button" data-tab="attendance">Attendance</button>
        <button class="tab" type="button" data-tab="settings">Settings</button>
      </nav>
    </header>

    <div class="status" id="status"></div>

    <section class="view active" id="view-dashboard">
      <div class="panel">
        <div class="card stat"><span class="label">Students</span><span class="value" id="m-students">0</span></div>
        <div class="card stat"><span class="label">Attendance rate</span><span class="value" id="m-rate">0%</span></div>
        <div class="card stat"><span class="label">Total present</span><span class="value" id="m-present">0</span></div>
        <div class="card stat"><span class="label">Program days</span><span class="value">{{TOTAL_DAYS}}</span></div>
      </div>
      <div class="card">
        <h2>Attendance overview</h2>
        <svg id="chart" viewBox="0 0 600 280" role="img" aria-label="Attendance chart"></svg>
        <p class="subtitle">Chart sampled every 5 days for readability.</p>
      </div>
    </section>

    <section class="view" id="view-students">
      <div class="card">
        <h2>Add new student</h2>
        <form id="student-form">
          <input name="name" placeholder="Full name, e.g. Juan Dela Cruz" required />
          <input name="schoolId" placeholder="School ID" />
          <input name="strand" placeholder="Strand / section" />
          <button class="primary" type="submit">Add student</button>
        </form>
      </div>
      <div class="card grid-wrap">
        <table>
          <thead><tr><th>Name</th><th>School ID</th><th>Strand</th><th></th></tr></thead>
          <tbody id="student-rows"></tbody>
        </table>
      </div>
    </section>

    <section class="view" id="view-attendance">
      <div class="card grid-wrap">
        <table>
          <thead id="grid-head"></thead>
          <tbody id="grid-body"></tbody>
        </table>
        <p class="subtitle">Click a cell to cycle: blank, P, A, L, E.</p>
      </div>
    </section>

    <section class="view" id="view-settings">
      <div class="card">
        <h2>Program</h2>
        <form id="settings-form">
          <label>Start date <input type="date" name="startDate" id="start-date" /></label>
          <button class="primary" type="submit">Save</button>
        </form>
      </div>
      <div class="card">
        <h2>Export &amp; collaboration</h2>
        <div class="panel">
          <a class="primary" href="/api/export/csv">Export to Excel (CSV)</a>
          <a class="primary" href="/api/export/json">Backup data (JSON)</a>
        </div>
        <h3>Import backup</h3>
        <input type="file" accept=".json" id="import-file" />
      </div>
    </section>
  </main>

  <aside class="card chat">
    <strong>Sparky</strong>
    <div class="log" id="chat-log">
      <div class="msg bot">Hi! Ask me who is at risk or how the class is doing.</div>
    </div>
    <form id="chat-form">
      <input id="chat-input" placeholder="Ask about attendance..." autocomplete="off" />
      <button class="primary" id="chat-send" type="submit">Send</button>
    </form>
  </aside>

  <script>
    const TOTAL_DAYS = {{TOTAL_DAYS}};
    const statusEl = document.getElementById('status');
    let data = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const api = async (path, options = {}) => {
      const res = await fetch(path, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const jsonBody = (method, body) => ({
      method,
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify(body)
    });

    const el = (tag, attrs = {}, text) => {
      const node = document.createElement(tag);
      Object.entries(attrs).forEach(([key, value]) => node.setAttribute(key, value));
      if (text !== undefined) {
        node.textContent = text;
      }
      return node;
    };

    const renderChart = (points) => {
      const chart = document.getElementById('chart');
      const width = 600;
      const height = 280;
      const pad = 36;
      const max = Math.max(1, ...points.flatMap((p) => [p.present, p.absent, p.late]));
      const group = (width - pad * 2) / points.length;
      const bar = group / 4;
      const y = (value) => height - pad - (value / max) * (height - pad * 2);
      let svg = '';
      points.forEach((p, i) => {
        const x = pad + i * group;
        [['present', 'var(--present)'], ['absent', 'var(--absent)'], ['late', 'var(--late)']].forEach(([key, color], j) => {
          svg += `<rect x="${x + bar * (j + 0.5)}" y="${y(p[key])}" width="${bar}" height="${height - pad - y(p[key])}" fill="${color}" rx="3" />`;
        });
        svg += `<text x="${x + group / 2}" y="${height - 12}" text-anchor="middle" font-size="11" fill="#6b7280">${p.label}</text>`;
      });
      chart.innerHTML = svg;
    };

    const renderStats = (stats) => {
      document.getElementById('m-students').textContent = stats.total_students;
      document.getElementById('m-rate').textContent = `${stats.attendance_rate}%`;
      document.getElementById('m-present').textContent = stats.total_present;
      renderChart(stats.chart_days);
    };

    const renderStudents = () => {
      const rows = document.getElementById('student-rows');
      rows.replaceChildren();
      data.students.forEach((student) => {
        const tr = el('tr');
        tr.append(el('td', {}, student.name), el('td', {}, student.schoolId), el('td', {}, student.strand));
        const remove = el('button', { class: 'danger', type: 'button' }, 'Remove');
        remove.addEventListener('click', () => removeStudent(student).catch((err) => setStatus(err.message, 'error')));
        const td = el('td');
        td.append(remove);
        tr.append(td);
        rows.append(tr);
      });
    };

    const renderGrid = () => {
      const head = document.getElementById('grid-head');
      const body = document.getElementById('grid-body');
      const headRow = el('tr');
      headRow.append(el('th', {}, 'Student'));
      for (let day = 1; day <= TOTAL_DAYS; day += 1) {
        headRow.append(el('th', {}, String(day)));
      }
      head.replaceChildren(headRow);
      body.replaceChildren();
      data.students.forEach((student) => {
        const tr = el('tr');
        tr.append(el('td', {}, student.name));
        const record = data.attendance[student.id] || {};
        for (let day = 1; day <= TOTAL_DAYS; day += 1) {
          const status = record[day] || '-';
          const td = el('td', { class: 'cell', 'data-status': status }, status === '-' ? '' : status);
          td.addEventListener('click', () => cycle(student.id, day, td).catch((err) => setStatus(err.message, 'error')));
          tr.append(td);
        }
        body.append(tr);
      });
    };

    const render = () => {
      document.getElementById('title').textContent = data.trainingTitle;
      document.title = data.trainingTitle;
      document.getElementById('start-date').value = data.startDate;
      renderStudents();
      renderGrid();
    };

    const refresh = async () => {
      const [snapshot, stats] = await Promise.all([api('/api/data'), api('/api/stats')]);
      data = snapshot;
      render();
      renderStats(stats);
    };

    const refreshStats = () => api('/api/stats').then(renderStats);

    const cycle = async (studentId, day, td) => {
      const cell = await api('/api/attendance/cycle', jsonBody('POST', { studentId, day }));
      data.attendance[studentId] = data.attendance[studentId] || {};
      if (cell.status === '-') {
        delete data.attendance[studentId][day];
      } else {
        data.attendance[studentId][day] = cell.status;
      }
      td.dataset.status = cell.status;
      td.textContent = cell.status === '-' ? '' : cell.status;
      await refreshStats();
    };

    const removeStudent = async (student) => {
      if (!confirm('Are you sure? This will remove the student and all their records.')) {
        return;
      }
      await api(`/api/students/${encodeURIComponent(student.id)}?confirm=true`, { method: 'DELETE' });
      await refresh();
      setStatus('Student removed', 'ok');
    };

    document.querySelectorAll('.tab').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('.tab').forEach((b) => b.classList.toggle('active', b === button));
        document.querySelectorAll('.view').forEach((view) => {
          view.classList.toggle('active', view.id === `view-${button.dataset.tab}`);
        });
      });
    });

    document.getElementById('title').addEventListener('click', async () => {
      const next = prompt('Training title', data ? data.trainingTitle : '');
      if (next === null) {
        return;
      }
      try {
        data = await api('/api/settings', jsonBody('PUT', { trainingTitle: next }));
        render();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('student-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = event.target;
      const payload = Object.fromEntries(new FormData(form).entries());
      try {
        await api('/api/students', jsonBody('POST', payload));
        form.reset();
        await refresh();
        setStatus('Student added', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('settings-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      try {
        data = await api('/api/settings', jsonBody('PUT', { startDate: document.getElementById('start-date').value }));
        render();
        setStatus('Saved', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      try {
        const text = await file.text();
        await api('/api/import', { method: 'POST', headers: { 'content-type': 'application/json' }, body: text });
        await refresh();
        alert('Data imported successfully!');
      } catch (err) {
        alert('Failed to import file. Please ensure it is a valid JDVP backup JSON.');
      } finally {
        event.target.value = '';
      }
    });

    const chatForm = document.getElementById('chat-form');
    const chatInput = document.getElementById('chat-input');
    const chatSend = document.getElementById('chat-send');
    const chatLog = document.getElementById('chat-log');

    const appendMessage = (role, text) => {
      chatLog.append(el('div', { class: `msg ${role}` }, text));
      chatLog.scrollTop = chatLog.scrollHeight;
    };

    chatForm.addEventListener('submit', async (event) => {
      event.preventDefault();
      const message = chatInput.value.trim();
      if (!message || chatSend.disabled) {
        return;
      }
      chatInput.value = '';
      appendMessage('user', message);
      chatSend.disabled = true;
      try {
        const res = await api('/api/chat', jsonBody('POST', { message }));
        appendMessage('bot', res.reply);
      } catch (err) {
        appendMessage('bot', err.message);
      } finally {
        chatSend.disabled = false;
      }
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"##;
