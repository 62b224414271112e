//! Static pages and the OpenAPI document.

/// Provisioning form served at `/` on the access point.
pub const PORTAL_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Gate setup</title>
</head>
<body>
<h1>Gate setup</h1>
<form action="/save" method="POST">
  <label>Network name<br><input name="ssid" maxlength="32" required></label><br>
  <label>Password<br><input name="password" type="password" maxlength="64" required></label><br>
  <button type="submit">Save</button>
</form>
<h2>Scripted setup</h2>
<pre>POST /config
Content-Type: application/json

{"ssid": "your-network", "password": "your-password"}</pre>
<p>The response is <code>{"apikey": "..."}</code>. The device restarts a few seconds later.</p>
</body>
</html>
"#;

/// Page shown after a successful form submit.
pub fn key_page(api_key: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta name="viewport" content="width=device-width, initial-scale=1"><title>Gate setup</title></head>
<body>
<h1>Saved</h1>
<p>Your API key:</p>
<pre>{api_key}</pre>
<p>Send it as <code>Authorization: Bearer {api_key}</code>. It is shown only once.</p>
<p>The device is restarting and will join your network.</p>
</body>
</html>
"#
    )
}

/// Form-route failure page.  `message` is one of the fixed validation
/// reasons, never user input.
pub fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Gate setup</title></head>
<body>
<h1>Not saved</h1>
<p>{message}</p>
<p><a href="/">Back</a></p>
</body>
</html>
"#
    )
}

/// API reference served at `/docs`.
pub const DOCS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Gate API</title></head>
<body>
<h1>Gate API</h1>
<p>All control routes require <code>Authorization: Bearer &lt;apikey&gt;</code>.
This page and <a href="/swagger.json">/swagger.json</a> are public.</p>
<table border="1" cellpadding="4">
<tr><th>Route</th><th>Method</th><th>Auth</th><th>Response</th></tr>
<tr><td>/open</td><td>GET</td><td>bearer</td><td><code>{"status":"gate opened"}</code></td></tr>
<tr><td>/close</td><td>GET</td><td>bearer</td><td><code>{"status":"gate closed"}</code></td></tr>
<tr><td>/docs</td><td>GET</td><td>none</td><td>this page</td></tr>
<tr><td>/swagger.json</td><td>GET</td><td>none</td><td>OpenAPI 3 document</td></tr>
</table>
<p>Open and close send the same relay pulse; the gate toggles.
A pulse lasts about three seconds and the call returns when it is done.
While one pulse runs, other control calls get 503.</p>
</body>
</html>
"#;

/// OpenAPI document served at `/swagger.json`.
pub const SWAGGER_JSON: &str = r##"{
  "openapi": "3.0.3",
  "info": { "title": "Gate API", "version": "1.0.0" },
  "components": {
    "securitySchemes": { "bearer": { "type": "http", "scheme": "bearer" } },
    "schemas": {
      "Status": { "type": "object", "properties": { "status": { "type": "string" } } },
      "Error": { "type": "object", "properties": { "error": { "type": "string" } } }
    }
  },
  "security": [ { "bearer": [] } ],
  "paths": {
    "/open": {
      "get": {
        "summary": "Pulse the gate relay",
        "responses": {
          "200": { "description": "Pulse completed", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Status" } } } },
          "401": { "description": "Missing or wrong bearer token" },
          "503": { "description": "A pulse is already running" },
          "504": { "description": "Pulse did not complete in time" }
        }
      }
    },
    "/close": {
      "get": {
        "summary": "Pulse the gate relay",
        "responses": {
          "200": { "description": "Pulse completed", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Status" } } } },
          "401": { "description": "Missing or wrong bearer token" },
          "503": { "description": "A pulse is already running" },
          "504": { "description": "Pulse did not complete in time" }
        }
      }
    },
    "/docs": {
      "get": { "summary": "API reference", "security": [], "responses": { "200": { "description": "HTML page" } } }
    },
    "/swagger.json": {
      "get": { "summary": "This document", "security": [], "responses": { "200": { "description": "OpenAPI document" } } }
    }
  }
}
"##;
