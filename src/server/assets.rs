/// Embedded page for the interactive viewer. The server renders the SVG; the
/// page only forwards gestures and swaps the markup in.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>osintree</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #0f172a;
            color: #e2e8f0;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #canvas {
            flex: 1;
            cursor: grab;
        }

        #canvas.panning {
            cursor: grabbing;
        }

        #sidebar {
            width: 280px;
            background: #111827;
            border-left: 1px solid #1f2937;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.3em;
            margin-bottom: 12px;
            color: #38bdf8;
        }

        h2 {
            font-size: 0.9em;
            margin: 18px 0 8px;
            color: #64748b;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 6px 0;
            border-bottom: 1px solid #1f2937;
            font-size: 0.9em;
        }

        .stat-value {
            color: #38bdf8;
            font-weight: bold;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 8px;
            padding: 4px 0;
            font-size: 0.85em;
        }

        .legend-color {
            width: 12px;
            height: 12px;
            border-radius: 50%;
        }

        .node {
            cursor: pointer;
        }

        .node text {
            font-size: 12px;
            user-select: none;
        }

        .node.exiting {
            pointer-events: none;
        }

        .link-out text {
            font-size: 11px;
        }

        #error {
            color: #f87171;
            font-size: 0.85em;
            margin-top: 12px;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="canvas"></div>
        <div id="sidebar">
            <h1 id="title">osintree</h1>
            <h2>Pass</h2>
            <div class="stat"><span>Visible nodes</span><span class="stat-value" id="visible">0</span></div>
            <div class="stat"><span>Created</span><span class="stat-value" id="created">0</span></div>
            <div class="stat"><span>Fading out</span><span class="stat-value" id="exiting">0</span></div>
            <div class="stat"><span>Zoom</span><span class="stat-value" id="zoom">1</span></div>
            <h2>Legend</h2>
            <div class="legend-item"><span class="legend-color" style="background:#64748b"></span>Category</div>
            <div class="legend-item"><span class="legend-color" style="background:#22c55e"></span>Tool</div>
            <div class="legend-item"><span class="legend-color" style="background:#eab308"></span>Registration required</div>
            <div class="legend-item"><span class="legend-color" style="background:#a855f7"></span>Dark web</div>
            <div class="legend-item"><span class="legend-color" style="background:#f97316"></span>Manual URL edit</div>
            <div id="error"></div>
        </div>
    </div>

    <script>
        const canvas = document.getElementById('canvas');
        let view = { zoom: 1, pan_x: 0, pan_y: 0 };
        let pollTimer = null;

        function show(scene) {
            canvas.innerHTML = scene.svg;
            document.getElementById('visible').textContent = scene.report.visible_nodes;
            document.getElementById('created').textContent = scene.report.created_nodes || 0;
            document.getElementById('exiting').textContent = scene.report.exiting_nodes || 0;
            document.getElementById('zoom').textContent = view.zoom.toFixed(2);
            document.getElementById('error').textContent = '';

            if (scene.navigate) {
                window.open(scene.navigate, '_blank', 'noopener');
            }

            clearTimeout(pollTimer);
            if (scene.animating) {
                pollTimer = setTimeout(() => request('GET', '/api/scene'), 40);
            }
        }

        async function request(method, url, body) {
            const options = { method, headers: { 'Content-Type': 'application/json' } };
            if (body !== undefined) {
                options.body = JSON.stringify(body);
            }
            const response = await fetch(url, options);
            const data = await response.json();
            if (!response.ok) {
                document.getElementById('error').textContent = data.error;
                return;
            }
            show(data);
        }

        function gesture(id, kind) {
            return request('POST', '/api/gesture', { id, kind });
        }

        function nodeOf(target) {
            const node = target.closest('.node');
            return node ? node.dataset.id : null;
        }

        canvas.addEventListener('click', (event) => {
            const id = nodeOf(event.target);
            if (!id) return;
            event.preventDefault();
            gesture(id, event.target.closest('.link-out') ? 'link' : 'click');
        });

        canvas.addEventListener('mouseover', (event) => {
            const id = nodeOf(event.target);
            const from = event.relatedTarget ? nodeOf(event.relatedTarget) : null;
            if (id && id !== from) gesture(id, 'enter');
        });

        canvas.addEventListener('mouseout', (event) => {
            const id = nodeOf(event.target);
            const to = event.relatedTarget ? nodeOf(event.relatedTarget) : null;
            if (id && id !== to) gesture(id, 'leave');
        });

        canvas.addEventListener('wheel', (event) => {
            event.preventDefault();
            const factor = event.deltaY < 0 ? 1.1 : 1 / 1.1;
            const zoom = Math.min(8, Math.max(0.1, view.zoom * factor));
            const rect = canvas.getBoundingClientRect();
            const mx = event.clientX - rect.left;
            const my = event.clientY - rect.top;
            view.pan_x = mx - (mx - view.pan_x) * (zoom / view.zoom);
            view.pan_y = my - (my - view.pan_y) * (zoom / view.zoom);
            view.zoom = zoom;
            request('POST', '/api/viewport', view);
        }, { passive: false });

        let drag = null;
        canvas.addEventListener('mousedown', (event) => {
            if (nodeOf(event.target)) return;
            drag = { x: event.clientX, y: event.clientY, pan_x: view.pan_x, pan_y: view.pan_y };
            canvas.classList.add('panning');
        });

        window.addEventListener('mousemove', (event) => {
            if (!drag) return;
            view.pan_x = drag.pan_x + event.clientX - drag.x;
            view.pan_y = drag.pan_y + event.clientY - drag.y;
            const group = canvas.querySelector('svg > g');
            if (group) {
                group.setAttribute('transform', `translate(${view.pan_x}, ${view.pan_y}) scale(${view.zoom})`);
            }
        });

        window.addEventListener('mouseup', () => {
            if (!drag) return;
            drag = null;
            canvas.classList.remove('panning');
            request('POST', '/api/viewport', view);
        });

        fetch('/api/tree')
            .then((r) => r.json())
            .then((tree) => {
                if (tree) document.getElementById('title').textContent = tree.name;
            });
        request('GET', '/api/scene');
    </script>
</body>
</html>
"#;
