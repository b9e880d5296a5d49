//! Human-facing dashboard.
//!
//! One self-contained HTML page that polls `/webhooks` every five seconds
//! and renders the recent window. Presentation only; everything it shows
//! comes from the JSON endpoints.

use axum::{extract::State, response::Html};

use super::AppState;

/// `GET /visualization`
pub async fn visualization(State(state): State<AppState>) -> Html<String> {
    Html(PAGE.replace("__CAPTURE_PATH__", &state.capture_path))
}

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Webhook Capture</title>
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: #f5f5f5;
      padding: 20px;
    }
    .container {
      max-width: 1200px;
      margin: 0 auto;
      background: white;
      border-radius: 8px;
      box-shadow: 0 2px 4px rgba(0,0,0,0.1);
      padding: 30px;
    }
    h1 { color: #333; margin-bottom: 10px; }
    .subtitle { color: #666; margin-bottom: 30px; }
    .info-box {
      background: #e3f2fd;
      border-left: 4px solid #2196f3;
      padding: 15px;
      margin-bottom: 20px;
      border-radius: 4px;
    }
    .info-box code {
      background: #fff;
      padding: 2px 6px;
      border-radius: 3px;
      font-family: 'Courier New', monospace;
    }
    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 15px;
      margin-bottom: 30px;
    }
    .stat-card {
      background: #f9f9f9;
      padding: 20px;
      border-radius: 6px;
      border: 1px solid #e0e0e0;
    }
    .stat-card h3 { color: #666; font-size: 14px; margin-bottom: 8px; }
    .stat-card p { color: #333; font-size: 24px; font-weight: bold; }
    .actions { margin-bottom: 20px; }
    button {
      background: #2196f3;
      color: white;
      border: none;
      padding: 10px 20px;
      border-radius: 4px;
      cursor: pointer;
      font-size: 14px;
      margin-right: 10px;
    }
    button:hover { background: #1976d2; }
    button.danger { background: #f44336; }
    button.danger:hover { background: #d32f2f; }
    .webhook-item {
      background: #f9f9f9;
      border: 1px solid #e0e0e0;
      border-radius: 6px;
      padding: 15px;
      margin-bottom: 15px;
    }
    .webhook-header { display: flex; justify-content: space-between; margin-bottom: 10px; }
    .webhook-id { font-weight: bold; color: #333; }
    .webhook-time { color: #666; font-size: 14px; }
    pre {
      background: #263238;
      color: #aed581;
      padding: 15px;
      border-radius: 4px;
      overflow-x: auto;
      font-size: 13px;
      line-height: 1.5;
    }
    .no-webhooks { text-align: center; padding: 40px; color: #999; }
  </style>
</head>
<body>
  <div class="container">
    <h1>Webhook Capture</h1>
    <p class="subtitle">Recent inbound requests</p>

    <div class="info-box">
      <strong>Capture endpoint:</strong><br>
      <code>POST __CAPTURE_PATH__</code>
    </div>

    <div class="stats">
      <div class="stat-card">
        <h3>Total webhooks</h3>
        <p id="total-webhooks">0</p>
      </div>
      <div class="stat-card">
        <h3>Last received</h3>
        <p id="last-received">-</p>
      </div>
    </div>

    <div class="actions">
      <button onclick="loadWebhooks()">Refresh</button>
      <button onclick="clearWebhooks()" class="danger">Clear all</button>
    </div>

    <div class="webhook-list" id="webhook-list">
      <div class="no-webhooks">No webhooks received yet...</div>
    </div>
  </div>

  <script>
    function formatDate(dateString) {
      return new Date(dateString).toLocaleString();
    }

    function formatTimeSince(dateString) {
      const seconds = Math.floor((new Date() - new Date(dateString)) / 1000);
      if (seconds < 60) return seconds + 's ago';
      if (seconds < 3600) return Math.floor(seconds / 60) + 'm ago';
      if (seconds < 86400) return Math.floor(seconds / 3600) + 'h ago';
      return Math.floor(seconds / 86400) + 'd ago';
    }

    async function loadWebhooks() {
      try {
        const response = await fetch('/webhooks?limit=20');
        const data = await response.json();

        document.getElementById('total-webhooks').textContent = data.total;

        if (data.data.length === 0) {
          document.getElementById('last-received').textContent = '-';
          document.getElementById('webhook-list').innerHTML =
            '<div class="no-webhooks">No webhooks received yet...</div>';
          return;
        }

        document.getElementById('last-received').textContent =
          formatTimeSince(data.data[0].timestamp);

        const html = data.data.map(webhook => `
          <div class="webhook-item">
            <div class="webhook-header">
              <span class="webhook-id">ID: ${webhook.id}</span>
              <span class="webhook-time">${formatDate(webhook.timestamp)}</span>
            </div>
            <pre>${JSON.stringify(webhook.body ?? null, null, 2)}</pre>
          </div>
        `).join('');

        document.getElementById('webhook-list').innerHTML = html;
      } catch (error) {
        console.error('Failed to load webhooks:', error);
      }
    }

    async function clearWebhooks() {
      if (!confirm('Clear all captured webhooks?')) {
        return;
      }
      try {
        await fetch('/webhooks', { method: 'DELETE' });
        loadWebhooks();
      } catch (error) {
        console.error('Failed to clear webhooks:', error);
      }
    }

    loadWebhooks();
    setInterval(loadWebhooks, 5000);
  </script>
</body>
</html>
"#;
