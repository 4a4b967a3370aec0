//! Static control page served at `/`.

pub(super) const INDEX_HTML: &str = concat!(
    "<!DOCTYPE html><html><head>",
    "<meta charset=\"utf-8\">",
    "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
    "<title>ESP32 Web Switch</title>",
    "<style>",
    "body{font-family:sans-serif;text-align:center;background:#f0f0f0;margin-top:40px}",
    "a.btn{display:block;width:80%;max-width:300px;margin:10px auto;padding:20px;",
    "font-size:20px;border-radius:10px;color:#fff;text-decoration:none}",
    "a.on{background:#4caf50}a.off{background:#f44336}a.btn:active{opacity:.6}",
    "</style></head>",
    "<body><h2>ESP32 Web Switch</h2>",
    "<a class=\"btn on\" href=\"/short\">Power on</a>",
    "<a class=\"btn off\" href=\"/long\">Force power off</a>",
    "</body></html>"
);
