pub fn render_index(user: &str, today: &str) -> String {
    INDEX_HTML
        .replace("{{USER}}", &escape_html(user))
        .replace("{{TODAY}}", &escape_html(today))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weight Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef4ee;
      --bg-2: #bfe0cf;
      --ink: #24302b;
      --accent: #2f8f6b;
      --accent-2: #2f4858;
      --muted: #7a746d;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4f1ea 60%, #f4f8f3 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
      min-width: 140px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    button.link {
      background: transparent;
      color: #c63b2b;
      padding: 4px 8px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      width: fit-content;
      margin-bottom: 12px;
    }

    .tab {
      background: transparent;
      padding: 8px 14px;
      font-size: 0.9rem;
      color: #6b645d;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    svg {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-target { fill: none; stroke: var(--accent-2); stroke-width: 2; stroke-dasharray: 6 6; }
    .chart-actual { fill: none; stroke: var(--accent); stroke-width: 3; }
    .chart-point { fill: white; stroke: var(--accent); stroke-width: 2; }
    .chart-grid { stroke: rgba(47, 72, 88, 0.12); }
    .chart-label { fill: var(--muted); font-size: 11px; }
    .bar-down { fill: var(--accent); }
    .bar-up { fill: #c63b2b; }

    table {
      width: 100%;
      border-collapse: collapse;
      background: white;
      border-radius: 16px;
      overflow: hidden;
    }

    th, td {
      padding: 10px 12px;
      text-align: right;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    th:first-child, td:first-child {
      text-align: left;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] { color: #c63b2b; }
    .status[data-type="ok"] { color: #2d7a4b; }

    @media (max-width: 600px) {
      .app { padding: 28px 20px; }
    }
  </style>
</head>
<body>
  <main class="app" data-user="{{USER}}" data-today="{{TODAY}}">
    <header>
      <h1>Weight Tracker</h1>
    </header>

    <section class="row">
      <label>User
        <select id="user-select"></select>
      </label>
      <button class="secondary" id="new-user" type="button">+ Add user</button>
    </section>

    <section>
      <h2>Plan</h2>
      <form id="settings-form" class="row">
        <label>Start weight (kg) <input id="start-weight" type="number" step="0.1" /></label>
        <label>Goal weight (kg) <input id="goal-weight" type="number" step="0.1" /></label>
        <label>Start date <input id="start-date" type="date" /></label>
        <label>Goal date <input id="goal-date" type="date" /></label>
        <button type="submit">Save plan</button>
      </form>
    </section>

    <section>
      <h2>Log weight</h2>
      <form id="log-form" class="row" method="post" action="/log">
        <input type="hidden" name="user" id="log-user" value="{{USER}}" />
        <label>Weight (kg) <input name="weight" id="log-weight" type="number" step="0.1" /></label>
        <label>Date <input name="date" id="log-date" type="date" value="{{TODAY}}" /></label>
        <button type="submit">Save entry</button>
      </form>
    </section>

    <section class="panel">
      <div class="stat"><span class="label">Current</span><span class="value" id="current">--</span></div>
      <div class="stat"><span class="label">Target today</span><span class="value" id="target-today">--</span></div>
      <div class="stat"><span class="label">Progress</span><span class="value" id="progress">--</span></div>
      <div class="stat"><span class="label">Days elapsed</span><span class="value" id="elapsed">--</span></div>
      <div class="stat"><span class="label">Days remaining</span><span class="value" id="remaining">--</span></div>
    </section>

    <section>
      <h2>Trajectory</h2>
      <div class="tabs" role="tablist">
        <button class="tab active" type="button" data-granularity="daily">Daily</button>
        <button class="tab" type="button" data-granularity="weekly">Weekly</button>
      </div>
      <div class="chart-card">
        <svg id="trajectory-chart" viewBox="0 0 600 260" aria-label="Target and actual weight" role="img"></svg>
      </div>
    </section>

    <section>
      <h2>Change per entry</h2>
      <div class="chart-card">
        <svg id="change-chart" viewBox="0 0 600 260" aria-label="Change between entries" role="img"></svg>
      </div>
    </section>

    <section>
      <h2>History</h2>
      <table>
        <thead>
          <tr><th>Date</th><th>Weight (kg)</th><th>Change</th><th>Progress (%)</th><th></th></tr>
        </thead>
        <tbody id="history"></tbody>
      </table>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const appEl = document.querySelector('.app');
    const userSelect = document.getElementById('user-select');
    const statusEl = document.getElementById('status');
    const historyEl = document.getElementById('history');
    const trajectoryEl = document.getElementById('trajectory-chart');
    const changeEl = document.getElementById('change-chart');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    const WIDTH = 600;
    const HEIGHT = 260;
    const PAD_X = 44;
    const PAD_Y = 34;
    const TOP = 20;

    let activeUser = appEl.dataset.user || '';
    let granularity = 'daily';

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const userUrl = (suffix = '') => `/api/users/${encodeURIComponent(activeUser)}${suffix}`;

    const request = async (url, options = {}) => {
      const res = await fetch(url, {
        headers: { 'content-type': 'application/json' },
        ...options
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const fmt = (value) => (typeof value === 'number' ? value.toFixed(1) : '--');

    const scale = (values) => {
      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }
      const range = max - min;
      const y = (value) => HEIGHT - PAD_Y - ((value - min) * (HEIGHT - TOP - PAD_Y)) / range;
      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = min + (range * i) / 4;
        grid += `<line class="chart-grid" x1="${PAD_X}" y1="${y(value)}" x2="${WIDTH - PAD_X}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${PAD_X - 8}" y="${y(value) + 4}" text-anchor="end">${value.toFixed(1)}</text>`;
      }
      return { y, grid };
    };

    const emptyChart = (el) => {
      el.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
    };

    const renderTrajectory = (points) => {
      if (!points.length) {
        emptyChart(trajectoryEl);
        return;
      }
      const values = points.flatMap((p) => (p.actual === null ? [p.target] : [p.target, p.actual]));
      const { y, grid } = scale(values);
      const step = points.length > 1 ? (WIDTH - PAD_X * 2) / (points.length - 1) : 0;
      const x = (i) => PAD_X + i * step;

      const target = points
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(2)} ${y(p.target).toFixed(2)}`)
        .join(' ');

      // missing days are skipped, never drawn as zero
      const logged = points
        .map((p, i) => ({ i, value: p.actual }))
        .filter((p) => p.value !== null);
      const actual = logged
        .map((p, n) => `${n === 0 ? 'M' : 'L'} ${x(p.i).toFixed(2)} ${y(p.value).toFixed(2)}`)
        .join(' ');
      const dots = logged
        .map((p) => `<circle class="chart-point" cx="${x(p.i)}" cy="${y(p.value)}" r="4" />`)
        .join('');

      const labelEvery = Math.max(1, Math.ceil(points.length / 8));
      const labels = points
        .map((p, i) => (i % labelEvery === 0
          ? `<text class="chart-label" x="${x(i)}" y="${HEIGHT - PAD_Y + 18}" text-anchor="middle">${p.date.slice(5)}</text>`
          : ''))
        .join('');

      trajectoryEl.innerHTML = `${grid}<path class="chart-target" d="${target}" />`
        + (actual ? `<path class="chart-actual" d="${actual}" />` : '')
        + `${dots}${labels}`;
    };

    const renderChanges = (logs) => {
      const entries = logs.slice(1);
      if (!entries.length) {
        emptyChart(changeEl);
        return;
      }
      const { y, grid } = scale([0, ...entries.map((e) => e.change)]);
      const slot = (WIDTH - PAD_X * 2) / entries.length;
      const bars = entries
        .map((e, i) => {
          const top = Math.min(y(e.change), y(0));
          const height = Math.max(Math.abs(y(e.change) - y(0)), 1);
          const cls = e.change > 0 ? 'bar-up' : 'bar-down';
          const x = PAD_X + i * slot + slot * 0.15;
          return `<rect class="${cls}" x="${x}" y="${top}" width="${slot * 0.7}" height="${height}" rx="3" />`;
        })
        .join('');
      changeEl.innerHTML = `${grid}${bars}`;
    };

    const renderHistory = (logs) => {
      historyEl.innerHTML = logs
        .map((e) => `<tr>
          <td>${e.date}</td><td>${fmt(e.weight)}</td><td>${fmt(e.change)}</td><td>${fmt(e.progress)}</td>
          <td><button class="link" type="button" data-date="${e.date}">Delete</button></td>
        </tr>`)
        .join('');
    };

    const renderSummary = (summary) => {
      document.getElementById('current').textContent = fmt(summary.currentWeight);
      document.getElementById('target-today').textContent = fmt(summary.targetWeightToday);
      document.getElementById('progress').textContent = `${fmt(summary.weightProgressPct)}%`;
      document.getElementById('elapsed').textContent = `${summary.daysElapsed} / ${summary.totalDays}`;
      document.getElementById('remaining').textContent = summary.daysRemaining;
    };

    const renderProfile = (profile) => {
      document.getElementById('start-weight').value = profile.startWeight;
      document.getElementById('goal-weight').value = profile.goalWeight;
      document.getElementById('start-date').value = profile.startDate;
      document.getElementById('goal-date').value = profile.goalDate;
      document.getElementById('log-user').value = activeUser;
      renderHistory(profile.logs);
      renderChanges(profile.logs);
    };

    const loadUsers = async () => {
      const { users } = await request('/api/users');
      if (activeUser && !users.includes(activeUser)) {
        users.push(activeUser);
      }
      if (!activeUser) {
        activeUser = users[0] || 'default';
        if (!users.includes(activeUser)) {
          users.push(activeUser);
        }
      }
      userSelect.innerHTML = users
        .map((u) => `<option value="${escapeText(u)}"${u === activeUser ? ' selected' : ''}>${escapeText(u)}</option>`)
        .join('');
    };

    const refresh = async () => {
      const [profile, summary, series] = await Promise.all([
        request(userUrl()),
        request(userUrl('/summary')),
        request(userUrl(`/series?granularity=${granularity}`))
      ]);
      renderProfile(profile);
      renderSummary(summary);
      renderTrajectory(series.points);
    };

    const saved = () => {
      setStatus('Saved', 'ok');
      setTimeout(() => setStatus('', ''), 1200);
      return refresh();
    };

    userSelect.addEventListener('change', () => {
      activeUser = userSelect.value;
      refresh().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('new-user').addEventListener('click', async () => {
      const name = window.prompt('Enter new user name:');
      if (!name || !name.trim()) {
        return;
      }
      try {
        await request('/api/users', { method: 'POST', body: JSON.stringify({ name }) });
        activeUser = name.trim();
        await loadUsers();
        await saved();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('settings-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const body = {
        startWeight: document.getElementById('start-weight').value,
        goalWeight: document.getElementById('goal-weight').value,
        startDate: document.getElementById('start-date').value,
        goalDate: document.getElementById('goal-date').value
      };
      request(userUrl('/settings'), { method: 'PUT', body: JSON.stringify(body) })
        .then(saved)
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('log-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const weightEl = document.getElementById('log-weight');
      if (!weightEl.value) {
        return;
      }
      const body = { weight: weightEl.value, date: document.getElementById('log-date').value || appEl.dataset.today };
      request(userUrl('/logs'), { method: 'POST', body: JSON.stringify(body) })
        .then(() => {
          weightEl.value = '';
          return saved();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    historyEl.addEventListener('click', (event) => {
      const date = event.target.dataset.date;
      if (!date) {
        return;
      }
      request(userUrl(`/logs/${date}`), { method: 'DELETE' })
        .then(saved)
        .catch((err) => setStatus(err.message, 'error'));
    });

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        granularity = button.dataset.granularity;
        tabs.forEach((tab) => tab.classList.toggle('active', tab === button));
        refresh().catch((err) => setStatus(err.message, 'error'));
      });
    });

    loadUsers()
      .then(refresh)
      .catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
