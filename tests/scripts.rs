use std::path::PathBuf;

use approx::assert_relative_eq;
use proptest::prelude::*;
use wirefield::prelude::*;

/// Per-test directory under the system temp dir, removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("wirefield-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn join(&self, file: &str) -> PathBuf {
        self.0.join(file)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Runs `script` line by line, stopping at `end`.
fn run(session: &mut Session, script: &str) -> Result<Flow, SessionError> {
    for line in script.lines() {
        if session.run_line(line)? == Flow::End {
            return Ok(Flow::End);
        }
    }
    Ok(Flow::Continue)
}

#[test]
fn helmholtz_script_writes_uniform_axial_map() {
    let dir = Scratch::new("helmholtz");
    let wires = dir.join("pair.wires");
    let axis = dir.join("axis.dat");
    let script = format!(
        "# Helmholtz pair, 1 m radius\n\
         file {wires}\n\
         current 2\n\
         helmholtz 0 0 0 1 0 1 180 +z\n\
         traj 11 0 0 -0.1 0 0 0.1 {axis}\n\
         end\n\
         circle 0 0 0 1 8 z\n",
        wires = wires.display(),
        axis = axis.display(),
    );

    let mut session = Session::new();
    assert_eq!(run(&mut session, &script).unwrap(), Flow::End);
    assert_eq!(session.wires().len(), 360);

    let saved = WireList::load(&wires).unwrap();
    assert_eq!(&saved, session.wires());

    let grid = Grid::read(&axis).unwrap();
    let centre = grid.fields()[5].z;
    // Two loops at ±R/2: B = 2 · μ0·N·I/(2R) · (4/5)^(3/2).
    assert_relative_eq!(
        centre,
        2.0 * loop_center_field(2.0, 1.0) * 0.8_f64.powf(1.5),
        max_relative = 1.0e-3
    );
    for f in grid.fields() {
        assert_relative_eq!(f.z, centre, max_relative = 2.0e-4);
    }
}

#[test]
fn golay_script_has_null_at_centre() {
    let mut session = Session::new();
    run(&mut session, "golay 0 0 0 0.4 2.5 2.094 0 1 0 1 30 z").unwrap();
    assert_eq!(session.wires().len(), 248);

    let centre = session.wires().field_at(&R3::zeros());
    let off = session.wires().field_at(&vector(0.1, 0.0, 0.0));
    assert!(centre.z.abs() < 1.0e-6 * off.z.abs());
}

#[test]
fn inductance_between_script_and_file() {
    let dir = Scratch::new("inductance");
    let other = dir.join("other.wires");

    let mut session = Session::new();
    run(&mut session, &format!("circle 0 0 1 1 180 z\nfile {}\nnofile", other.display())).unwrap();
    assert!(other.exists());

    run(
        &mut session,
        &format!("clear\ncircle 0 0 0 1 180 z\ninductance {}", other.display()),
    )
    .unwrap();
    let forward = session.last_inductance().unwrap();

    run(
        &mut session,
        &format!("clear\ncircle 0 0 0 1 180 -z\ninductance {}", other.display()),
    )
    .unwrap();
    assert_relative_eq!(session.last_inductance().unwrap(), -forward, max_relative = 1.0e-12);
}

#[test]
fn bad_lines_are_reported_and_skipped() {
    let mut session = Session::new();
    let outcomes: Vec<_> = [
        "lineto 1 0 0",
        "lineto 1 0",
        "spiral 0 0 0",
        "circle 0 0 0 -1 16 z",
        "arc 0 0 0 1 0.5 0.5 8 z",
        "lineto 1 1 0",
    ]
    .iter()
    .map(|line| session.run_line(line))
    .collect();

    assert!(outcomes[0].is_ok());
    assert!(matches!(outcomes[1], Err(SessionError::Parse(ParseError::MissingArgument { .. }))));
    assert!(matches!(outcomes[2], Err(SessionError::Parse(ParseError::UnknownCommand(_)))));
    assert!(matches!(
        outcomes[3],
        Err(SessionError::Field(FieldError::InvalidParameter(_)))
    ));
    assert!(outcomes[4].is_err());
    assert!(outcomes.iter().flatten().count() == 2);
    assert!(outcomes.iter().all(|o| o.as_ref().map_or_else(|e| !e.is_fatal(), |_| true)));
    assert_eq!(session.wires().len(), 2);
}

proptest! {
    #[test]
    fn surface_grid_command_writes_every_point(m in 1usize..6, n in 1usize..6, dim in 0usize..3) {
        let dir = Scratch::new("surface");
        let out = dir.join(&format!("grid-{m}-{n}-{dim}.dat"));
        let axis = ["x", "y", "z"][dim];
        let mut session = Session::new();
        run(&mut session, "current -3\nsquarespiral 0 0 0 1 0.1 3").unwrap();
        run(&mut session, &format!("grid {m} {n} 0 0 0.2 0.5 0.5 {axis} {}", out.display())).unwrap();

        let grid = Grid::read(&out).unwrap();
        prop_assert_eq!((grid.rows(), grid.cols()), (m, n));
        prop_assert_eq!(grid.len(), m * n);
        for (p, f) in grid.points().iter().zip(grid.fields()) {
            let direct = session.wires().field_at(p);
            prop_assert!((direct - f).norm() <= 1.0e-12 * (1.0 + direct.norm()));
        }
    }
}
