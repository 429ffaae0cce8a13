use std::process::{Command, Output};

fn castle_maze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_castle-maze"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run castle-maze")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "castle-maze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn plan_has_one_line_per_wall_row_and_room_row() {
    let plan = stdout(&castle_maze(&[
        "--columns", "6", "--rows", "4", "--seed", "3",
    ]));

    let lines: Vec<&str> = plan.lines().collect();
    assert_eq!(lines.len(), 2 * 4 + 1);
    assert!(
        lines.iter().all(|line| line.chars().count() == 2 * 6 + 1),
        "every plan line spans the full castle width:\n{plan}"
    );
    assert!(lines[0].chars().all(|glyph| glyph == '#'), "rampart is solid");
}

#[test]
fn castle_codes_reproduce_the_castle() {
    let code = stdout(&castle_maze(&[
        "--columns", "14", "--rows", "9", "--seed", "77", "--format", "code",
    ]));
    assert!(code.starts_with("castle:v1:14x9:"), "unexpected code {code}");

    let direct = stdout(&castle_maze(&[
        "--columns", "14", "--rows", "9", "--seed", "77", "--format", "parts",
    ]));
    let shared = stdout(&castle_maze(&["--code", code.trim(), "--format", "parts"]));

    assert_eq!(direct, shared, "a shared code rebuilds the same castle");
}

#[test]
fn invalid_configuration_fails() {
    let output = castle_maze(&["--columns", "0"]);

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("invalid castle configuration"),
        "error names the failing step"
    );
}
