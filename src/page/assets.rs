//! Static stylesheet and script for the dashboard page.
//!
//! Embedded as string constants; the only external assets are the two
//! charting libraries.

pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";
pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

pub const STYLE: &str = r#"
:root {
  --bg: #f5f7fa;
  --surface: #ffffff;
  --border: #dfe3e8;
  --text: #2c3e50;
  --text-muted: #7f8c8d;
  --positive: #2ecc71;
  --negative: #e74c3c;
  --accent: #3498db;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header { display: flex; align-items: baseline; justify-content: space-between; margin-bottom: 24px; }
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 12px; }

.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 20px; margin-bottom: 16px; }
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 12px; }

textarea { width: 100%; min-height: 90px; padding: 10px; border: 1px solid var(--border); border-radius: 6px; font: inherit; resize: vertical; }
button { margin-top: 10px; padding: 8px 20px; border: none; border-radius: 6px; background: var(--accent); color: #fff; font-weight: 600; cursor: pointer; }

.result { margin-top: 16px; padding: 12px; border-radius: 6px; border-left: 4px solid transparent; }
.result.positive { border-left-color: var(--positive); background: rgba(46, 204, 113, 0.08); }
.result.negative { border-left-color: var(--negative); background: rgba(231, 76, 60, 0.08); }
.result.error { border-left-color: var(--negative); }
.error-message { color: var(--negative); font-weight: 600; }
.loading { color: var(--text-muted); font-style: italic; }

.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); gap: 16px; }
.chart-host { position: relative; height: 320px; }
.slot-status { font-size: 12px; margin-bottom: 8px; }
.slot-status.empty { color: #7f8c8d; }
.slot-status.failed { color: var(--negative); }
.slot-status.unreachable { color: #d35400; }

.wordcloud img { max-width: 100%; border-radius: 6px; }
.words { margin-top: 10px; font-size: 12px; color: var(--text-muted); }
.hidden { display: none; }
"#;

/// Draws every embedded chart and wires the analyze form.
pub const SCRIPT: &str = r#"
function drawCharts() {
  const embeds = JSON.parse(document.getElementById('dashboard-charts').textContent);
  for (const c of embeds) {
    const el = document.getElementById(c.element);
    if (!el) continue;
    if (c.library === 'chartjs') {
      const cfg = c.options;
      if (c.tooltips.length) {
        cfg.options.plugins.tooltip = { callbacks: { label: ctx => c.tooltips[ctx.dataIndex] } };
      }
      new Chart(el.getContext('2d'), cfg);
    } else {
      const chart = echarts.init(el);
      const opt = c.options;
      if (opt.series.length && opt.series[0].type === 'heatmap') {
        opt.tooltip.formatter = p => (p.data && p.data.tip) || '';
      }
      chart.setOption(opt);
      if (c.resize) window.addEventListener('resize', () => chart.resize());
    }
  }
}

async function analyzeText() {
  const text = document.getElementById('textInput').value;
  const resultDiv = document.getElementById('result');
  resultDiv.className = 'result loading';
  resultDiv.innerHTML = '<div class="loading">Analyzing...</div>';
  try {
    const res = await fetch('/analyze', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ text })
    });
    const html = await res.text();
    document.open();
    document.write(html);
    document.close();
  } catch (e) {
    resultDiv.className = 'result error';
    resultDiv.innerHTML = '<div class="error-message">Error: dashboard server unreachable</div>';
  }
}

drawCharts();
"#;
