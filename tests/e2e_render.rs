//! End-to-end rendering tests (require Chrome to be installed)

use std::sync::Once;

use chatshot::{render_image, Message, RenderConfig, RenderRequest, Renderer, Theme};
use image::GenericImageView;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

// 1x1 opaque magenta PNG
const AVATAR_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
    0x77, 0x53, 0xde, 0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x38,
    0xc3, 0x90, 0x06, 0x00, 0x02, 0xce, 0x01, 0x33, 0x4e, 0x85, 0x59, 0x4c, 0x00, 0x00, 0x00,
    0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Start a fixture server that serves an avatar image
fn start_avatar_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18090").unwrap();
            for request in server.incoming_requests() {
                let response = match request.url() {
                    "/avatar.png" => Response::from_data(AVATAR_PNG.to_vec()).with_header(
                        "Content-Type: image/png".parse::<tiny_http::Header>().unwrap(),
                    ),
                    _ => Response::from_data(b"Not Found".to_vec()).with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        // Give the server time to start
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18090".to_string()
}

fn msg(nickname: &str, avatar: Option<&str>, content: &str) -> Message {
    Message {
        nickname: nickname.to_string(),
        avatar: avatar.map(|s| s.to_string()),
        content: content.to_string(),
    }
}

fn png_width(data: &[u8]) -> u32 {
    u32::from_be_bytes(data[16..20].try_into().unwrap())
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_light_theme_screenshot_width() {
    let request = RenderRequest {
        messages: vec![msg("Alice", None, "Hi")],
        theme: Theme::Light,
        width: 1200,
    };

    let renderer = Renderer::new(RenderConfig::default());
    let png = match renderer.render(&request) {
        Ok(png) => png,
        Err(e) => {
            eprintln!("Skipping: Chrome unavailable or failed to launch: {}", e);
            return;
        }
    };

    assert!(png.len() > 100, "PNG data seems too small");
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    // 600 CSS px layout width, doubled by the page scale.
    assert_eq!(png_width(&png), 1200);
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_dark_theme_background_pixel() {
    let request = RenderRequest {
        messages: vec![msg("Alice", None, "Hi")],
        theme: Theme::Dark,
        width: 1200,
    };

    let renderer = Renderer::new(RenderConfig::default());
    let png = match renderer.render(&request) {
        Ok(png) => png,
        Err(e) => {
            eprintln!("Skipping: Chrome unavailable or failed to launch: {}", e);
            return;
        }
    };

    let img = image::load_from_memory(&png).expect("Failed to decode screenshot");
    // Inside the container's 7px padding, before any row content.
    let [r, g, b, _] = img.get_pixel(5, 5).0;

    // Documented dark page background is #221f33, light is #f2f0fa.
    let dist = |c: [u8; 3]| -> u32 {
        let dr = (r as i32 - c[0] as i32).abs() as u32;
        let dg = (g as i32 - c[1] as i32).abs() as u32;
        let db = (b as i32 - c[2] as i32).abs() as u32;
        dr + dg + db
    };
    let to_dark = dist([0x22, 0x1f, 0x33]);
    let to_light = dist([0xf2, 0xf0, 0xfa]);
    assert!(
        to_dark < to_light,
        "corner pixel ({}, {}, {}) is closer to the light background",
        r,
        g,
        b
    );
    assert!(to_dark < 48, "corner pixel too far from #221f33");
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_avatar_fetched_before_capture() {
    let base_url = start_avatar_server();
    let request = RenderRequest {
        messages: vec![msg(
            "Bob",
            Some(&format!("{}/avatar.png", base_url)),
            "check my avatar",
        )],
        theme: Theme::Light,
        width: 1600,
    };

    let renderer = Renderer::new(RenderConfig::default());
    let png = match renderer.render(&request) {
        Ok(png) => png,
        Err(e) => {
            eprintln!("Skipping: Chrome unavailable or failed to launch: {}", e);
            return;
        }
    };

    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(png_width(&png), 1600);
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn test_async_facade() {
    let request = RenderRequest {
        messages: vec![msg("Alice", None, "Hi")],
        theme: Theme::Light,
        width: 1200,
    };

    match render_image(request, RenderConfig::default()).await {
        Ok(png) => {
            assert!(!png.is_empty());
            assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
        }
        Err(e) => eprintln!("Skipping: Chrome unavailable or failed to launch: {}", e),
    }
}
