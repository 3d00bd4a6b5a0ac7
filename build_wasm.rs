use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("🚀 Building slidekit WASM with demo page...");

    // 1. wasm-pack でビルド
    println!("📦 Running wasm-pack build...");
    let status = match Command::new("wasm-pack")
        .env("CARGO_INCREMENTAL", "1")
        .args([
            "build",
            "--dev",
            "--target",
            "web",
            "--out-dir",
            "pkg",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .status()
    {
        Ok(status) => status,
        Err(e) => {
            eprintln!("❌ Failed to execute wasm-pack: {}", e);
            std::process::exit(1);
        }
    };

    if !status.success() {
        eprintln!("❌ wasm-pack build failed");
        std::process::exit(1);
    }

    println!("✅ WASM build completed");

    // 2. デモページを生成
    println!("📝 Generating HTML file...");
    let pkg_dir = Path::new("pkg");
    if let Err(e) = fs::write(pkg_dir.join("index.html"), demo_html(10)) {
        eprintln!("❌ Failed to write index.html: {}", e);
        std::process::exit(1);
    }

    println!("✅ HTML file generated:");
    println!("   - pkg/index.html");
    println!("\n🎉 Build complete! Serve pkg/ with any static file server.");
}

fn demo_html(card_count: usize) -> String {
    let cards: String = (1..=card_count)
        .map(|i| format!("            <div class=\"cr-course-card\">Course {}</div>\n", i))
        .collect();
    let slides: String = (1..=6)
        .map(|i| {
            format!(
                r#"            <div class="group">
                <div class="relative overflow-hidden rounded-2xl">
                    <div class="p-5">
                        <p class="testimonial-text">Testimonial {i}. Lorem ipsum dolor sit amet, consectetur adipiscing elit.<span class="fade"></span></p>
                        <button class="read-more">Read More</button>
                    </div>
                </div>
            </div>
"#
            )
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>slidekit</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        .cr-carousel-container {{ overflow: hidden; width: 100%; }}
        #crCarousel {{ display: flex; column-gap: 24px; }}
        .cr-course-card {{ flex: 0 0 280px; height: 180px; background: #eee; }}
        .cr-course-card.active {{ outline: 2px solid #d946ef; }}
        #crIndicators {{ display: flex; gap: 8px; justify-content: center; }}
        .cr-indicator {{ width: 10px; height: 10px; border-radius: 50%; background: #ccc; }}
        .cr-indicator.active {{ background: #d946ef; }}
        .carousel-track {{ display: flex; overflow-x: auto; }}
        .carousel-track > .group {{ flex: 0 0 100%; }}
        @media (min-width: 1024px) {{ .carousel-track > .group {{ flex-basis: 33.333%; }} }}
        .testimonial-text {{ max-height: 4.5em; overflow: hidden; position: relative; }}
        .testimonial-text.expanded {{ max-height: none; }}
        .hidden {{ display: none; }}
    </style>
</head>
<body>
    <input type="checkbox" id="sidebar-toggle">
    <label id="sidebar-toggle-label" for="sidebar-toggle">☰</label>
    <nav id="sidebar">
        <div id="sidebar-inner">
            <ul id="main-menu" tabindex="-1">
                <li><button data-open-submenu="courses" aria-expanded="false">Courses</button></li>
            </ul>
            <div id="submenu-courses" class="submenu-panel" aria-hidden="true">
                <button data-back-button>Back</button>
                <a href="#">Web basics</a>
            </div>
        </div>
    </nav>

    <div class="cr-carousel-wrapper">
        <button id="crSidePrevBtn">‹</button>
        <div class="cr-carousel-container">
            <div id="crCarousel">
{cards}            </div>
        </div>
        <button id="crSideNextBtn">›</button>
        <div id="crIndicators"></div>
    </div>

    <div class="carousel-track">
{slides}    </div>

    <div class="faq-item">
        <button>What is slidekit? <span class="text-pink-500">+</span></button>
        <div class="hidden">A small set of page widgets compiled to WebAssembly.</div>
    </div>
    <div class="faq-item">
        <button>Does it need a framework? <span class="text-pink-500">+</span></button>
        <div class="hidden">No. It binds to plain markup.</div>
    </div>

    <label><input type="radio" name="billing" id="bill-monthly" checked> Monthly</label>
    <label><input type="radio" name="billing" id="bill-yearly"> Yearly</label>
    <p class="price-monthly">$10 / month</p>
    <p class="price-yearly" style="display: none">$100 / year</p>

    <input type="file" class="upload-input" accept="image/*">
    <div>
        <img class="uploaded-img hidden" alt="avatar">
        <span class="default-avatar">👤</span>
    </div>

    <div id="video-container" style="height: 320px"><div id="video-placeholder">Loading video…</div></div>
    <div id="video-container-mobile" style="height: 200px"></div>

    <script type="module">
        import init, {{ mount }} from './slidekit.js';
        init().then(() => {{ window.slidekit = mount(); }}).catch(console.error);
    </script>
</body>
</html>
"##
    )
}
