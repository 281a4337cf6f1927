//! Integration tests for the state codec.
//!
//! The wire layout is externally fixed, so these tests pin it down two
//! ways: exact round-trip equality across section combinations, and
//! golden byte-offset checks that would catch a reordered or
//! de-interleaved field.

use granum_io::codec::{STATE_FORMAT_VERSION, STATE_MAGIC};
use granum_io::{decode, encode, SectionHints, WireFormat};
use granum_state::{FluidGrid, Periodicity, SimState, WallMode};
use granum_types::{GranumError, ParticleId};

/// Builds a fully-populated state with varied, index-dependent values
/// so a transposed or shifted field cannot round-trip by accident.
fn rich_state(n: usize, nw: usize, bonds: bool, fluid: bool) -> SimState {
    let mut state = SimState::new(n, nw).unwrap();

    state.world.origin = [-1.0, -2.0, 0.25];
    state.world.extent = [10.0, 12.0, 14.0];
    state.world.cells = [3, 4, 5];
    state.world.periodic = Periodicity::Horizontal;

    state.time.dt = 1.25e-8;
    state.time.current = 0.375;
    state.time.total = 2.5;
    state.time.file_interval = 0.01;
    state.time.step_count = 37;

    for i in 0..n {
        let f = i as f64;
        state.particles.pos[i] = [f * 0.1, f * 0.2 + 1.0, f * 0.3 + 2.0];
        state.particles.radius[i] = 0.01 + f * 1e-4;
        state.particles.lateral_disp[i] = [f * 0.01, -f * 0.01];
        state.particles.vel[i] = [f, -f, f * 0.5];
        state.particles.fixed_vel[i] = if i % 3 == 0 { 1.0 } else { 0.0 };
        state.particles.force[i] = [f * 2.0, f * 3.0, f * 4.0];
        state.particles.ang_pos[i] = [f * 0.11, f * 0.12, f * 0.13];
        state.particles.ang_vel[i] = [-f, f, -f * 0.5];
        state.particles.torque[i] = [f * 5.0, f * 6.0, f * 7.0];
        state.particles.shear_diss_rate[i] = f * 1e-3;
        state.particles.shear_diss[i] = f * 1e-2;
        state.particles.visc_diss_rate[i] = f * 1e-4;
        state.particles.visc_diss[i] = f * 1e-1;
        state.particles.pressure[i] = 100.0 + f;
    }

    state.params.g = [0.0, 0.0, -9.80665];
    state.params.gamma_n = 1.0e2;
    state.params.kappa = 4.5e-5;
    state.params.debond_dist = 1.0e-4;
    state.params.v_b = 1.0e-12;
    state.params.nu = 1.787e-6;

    for w in 0..nw {
        let f = w as f64;
        state.walls.mode[w] = WallMode::StressControlled;
        state.walls.normal[w] = if w == 0 {
            [0.0, 0.0, -1.0]
        } else {
            [f, 0.0, 0.0]
        };
        state.walls.pos[w] = 1.0 + f;
        state.walls.mass[w] = 10.0 * (f + 1.0);
        state.walls.vel[w] = -0.001 * f;
        state.walls.force[w] = f * 100.0;
        state.walls.stress_target[w] = 10e3 + f;
    }
    state.walls.osc_amplitude = 2.5e3;
    state.walls.osc_frequency = 0.2;

    if bonds {
        let graph = state.enable_bonds();
        graph.radius_multiplier = 0.8;
        graph.strength_normal = 1.0e6;
        graph.strength_shear = 5.0e5;
        if n >= 2 {
            graph.add_bond(ParticleId(0), ParticleId(1)).unwrap();
            graph.normal_disp[0] = 1e-6;
            graph.tangential_disp[0] = [1e-7, 2e-7, 3e-7];
            graph.normal_rot[0] = 4e-7;
            graph.tangential_rot[0] = [5e-7, 6e-7, 7e-7];
        }
        if n >= 4 {
            graph.add_bond(ParticleId(2), ParticleId(3)).unwrap();
        }
    }

    if fluid {
        let mut grid = FluidGrid::zeroed(state.world.cells);
        for c in 0..grid.cell_count() {
            let f = c as f64;
            grid.velocity[c] = [f * 0.01, -f * 0.01, f * 0.02];
            grid.pressure[c] = 600.0 + f;
            grid.porosity[c] = 0.4 + f * 1e-3;
            grid.porosity_rate[c] = f * 1e-5;
        }
        state.fluid = Some(grid);
    }

    state
}

// ─── Round-Trip Tests ─────────────────────────────────────────

#[test]
fn round_trip_all_section_combinations() {
    for &(n, nw) in &[(0usize, 0usize), (1, 0), (7, 1), (16, 5)] {
        for &bonds in &[false, true] {
            for &fluid in &[false, true] {
                let state = rich_state(n, nw, bonds, fluid);
                let hints = SectionHints::for_state(&state);

                let bytes = encode(&state, WireFormat::Legacy).unwrap();
                let back = decode(&bytes, hints).unwrap();
                assert_eq!(state, back, "legacy n={n} nw={nw} bonds={bonds} fluid={fluid}");

                let bytes = encode(&state, WireFormat::Envelope).unwrap();
                // The envelope is self-describing: hints are ignored.
                let back = decode(&bytes, SectionHints::default()).unwrap();
                assert_eq!(
                    state, back,
                    "envelope n={n} nw={nw} bonds={bonds} fluid={fluid}"
                );
            }
        }
    }
}

#[test]
fn encode_is_deterministic() {
    let state = rich_state(5, 2, true, true);
    let a = encode(&state, WireFormat::Legacy).unwrap();
    let b = encode(&state, WireFormat::Legacy).unwrap();
    assert_eq!(a, b);
}

#[test]
fn decoded_lengths_match_counts() {
    let state = rich_state(9, 3, true, true);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let back = decode(&bytes, SectionHints { bonds: true, fluid: true }).unwrap();

    assert_eq!(back.particle_count(), 9);
    assert_eq!(back.particles.torque.len(), 9);
    assert_eq!(back.particles.pressure.len(), 9);
    assert_eq!(back.wall_count(), 3);
    assert_eq!(back.walls.stress_target.len(), 3);
    let fluid = back.fluid.as_ref().unwrap();
    assert_eq!(fluid.cells, back.world.cells);
    assert_eq!(fluid.pressure.len(), fluid.cell_count());
}

#[test]
fn decoded_bond_endpoints_are_in_range() {
    let state = rich_state(4, 0, true, false);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let back = decode(&bytes, SectionHints { bonds: true, fluid: false }).unwrap();
    let n = back.particle_count() as u32;
    for pair in &back.bonds.as_ref().unwrap().pairs {
        assert!(pair[0] < n && pair[1] < n);
        assert_ne!(pair[0], pair[1]);
    }
}

// ─── Golden Layout Tests ──────────────────────────────────────

#[test]
fn empty_state_has_fixed_length() {
    let state = rich_state(0, 0, false, false);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    // 8 counts + 36 temporal + 64 world + 164 material parameters
    // + 20 wall section + 8 fluid viscosity.
    assert_eq!(bytes.len(), 300);

    // Stream opens with dimensionality 3 (int32) and N (uint32).
    assert_eq!(&bytes[0..4], &3i32.to_le_bytes());
    assert_eq!(&bytes[4..8], &0u32.to_le_bytes());
    // Fluid viscosity is the trailing field even with no fluid grid.
    assert_eq!(&bytes[292..300], &1.787e-6f64.to_le_bytes());
}

#[test]
fn per_particle_payload_is_216_bytes() {
    let empty = encode(&rich_state(0, 0, false, false), WireFormat::Legacy).unwrap();
    let one = encode(&rich_state(1, 0, false, false), WireFormat::Legacy).unwrap();
    assert_eq!(one.len() - empty.len(), 216);
}

#[test]
fn radius_is_interleaved_after_position() {
    let mut state = rich_state(2, 0, false, false);
    state.particles.radius[0] = 2.5;
    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    // Particle section starts at 108 (8 + 36 + 64); particle 0's radius
    // follows its position triple.
    assert_eq!(&bytes[132..140], &2.5f64.to_le_bytes());
    // Particle 1's position starts right after, not after all radii.
    assert_eq!(&bytes[140..148], &state.particles.pos[1][0].to_le_bytes());
}

#[test]
fn envelope_has_magic_and_version() {
    let state = rich_state(1, 0, true, false);
    let bytes = encode(&state, WireFormat::Envelope).unwrap();
    assert_eq!(&bytes[0..4], &STATE_MAGIC);
    assert_eq!(bytes[4], STATE_FORMAT_VERSION);
    assert_eq!(bytes[5], 0b01); // bonds bit set, fluid bit clear

    // Body is byte-identical to the legacy encoding.
    let legacy = encode(&state, WireFormat::Legacy).unwrap();
    assert_eq!(&bytes[6..], &legacy[..]);
}

#[test]
fn unsupported_envelope_version_is_rejected() {
    let state = rich_state(1, 0, false, false);
    let mut bytes = encode(&state, WireFormat::Envelope).unwrap();
    bytes[4] = 99;
    let err = decode(&bytes, SectionHints::default()).unwrap_err();
    assert!(matches!(err, GranumError::Decoding(_)));
}

// ─── Truncation Tests ─────────────────────────────────────────

#[test]
fn every_proper_prefix_fails_to_decode() {
    let state = rich_state(3, 2, true, true);
    let hints = SectionHints { bonds: true, fluid: true };
    let bytes = encode(&state, WireFormat::Legacy).unwrap();

    for cut in 0..bytes.len() {
        let err = decode(&bytes[..cut], hints).unwrap_err();
        assert!(
            matches!(err, GranumError::Decoding(_)),
            "prefix of {cut} bytes must fail with a decoding error"
        );
    }
    // The full stream still decodes.
    assert_eq!(decode(&bytes, hints).unwrap(), state);
}

#[test]
fn implausible_particle_count_is_rejected_before_allocation() {
    let state = rich_state(0, 0, false, false);
    let mut bytes = encode(&state, WireFormat::Legacy).unwrap();
    // Claim u32::MAX particles in an otherwise tiny stream.
    bytes[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = decode(&bytes, SectionHints::default()).unwrap_err();
    assert!(matches!(err, GranumError::Decoding(_)));
}

// ─── Section-Flag Sensitivity Tests ───────────────────────────

#[test]
fn fluid_flag_mismatch_never_silently_agrees() {
    let state = rich_state(4, 0, false, true);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();

    let correct = decode(&bytes, SectionHints { bonds: false, fluid: true }).unwrap();
    assert_eq!(correct, state);

    // Decoding without the fluid hint must not reproduce the correctly
    // flagged result: here the leftover fluid payload is detected.
    match decode(&bytes, SectionHints { bonds: false, fluid: false }) {
        Err(GranumError::Decoding(_)) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
        Ok(wrong) => assert_ne!(wrong, correct),
    }
}

#[test]
fn missing_fluid_section_fails_when_hinted() {
    let state = rich_state(4, 0, false, false);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let err = decode(&bytes, SectionHints { bonds: false, fluid: true }).unwrap_err();
    assert!(matches!(err, GranumError::Decoding(_)));
}

#[test]
fn bonds_flag_mismatch_never_silently_agrees() {
    let state = rich_state(4, 0, true, false);
    let bytes = encode(&state, WireFormat::Legacy).unwrap();

    let correct = decode(&bytes, SectionHints { bonds: true, fluid: false }).unwrap();
    match decode(&bytes, SectionHints::default()) {
        Err(GranumError::Decoding(_)) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
        Ok(wrong) => assert_ne!(wrong, correct),
    }
}

#[test]
fn envelope_ignores_wrong_hints() {
    let state = rich_state(4, 1, true, true);
    let bytes = encode(&state, WireFormat::Envelope).unwrap();
    // Deliberately wrong hints: the flags byte wins.
    let back = decode(&bytes, SectionHints { bonds: false, fluid: false }).unwrap();
    assert_eq!(back, state);
}

// ─── Concrete Scenarios ───────────────────────────────────────

#[test]
fn uniform_fluid_pressure_scenario() {
    let mut state = SimState::new(100, 0).unwrap();
    state.world.extent = [1.0, 1.0, 1.0];
    state.world.cells = [4, 4, 4];
    let mut grid = FluidGrid::zeroed(state.world.cells);
    for p in &mut grid.pressure {
        *p = 1.0;
    }
    state.fluid = Some(grid);

    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let back = decode(&bytes, SectionHints { bonds: false, fluid: true }).unwrap();

    let fluid = back.fluid.as_ref().unwrap();
    assert_eq!(fluid.cell_count(), 64);
    assert!(fluid.pressure.iter().all(|&p| p == 1.0));
    assert!(fluid.velocity.iter().all(|&v| v == [0.0; 3]));
    assert!(fluid.porosity.iter().all(|&phi| phi == 0.0));
}

#[test]
fn single_bond_scenario() {
    let mut state = SimState::new(2, 0).unwrap();
    state.enable_bonds().add_bond(ParticleId(0), ParticleId(1)).unwrap();

    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let back = decode(&bytes, SectionHints { bonds: true, fluid: false }).unwrap();

    let bonds = back.bonds.as_ref().unwrap();
    assert_eq!(bonds.len(), 1);
    let [i, j] = bonds.pairs[0];
    assert!((i, j) == (0, 1) || (i, j) == (1, 0));
    assert_ne!(i, j);
}

#[test]
fn triaxial_wall_scenario() {
    let mut state = SimState::new(8, 0).unwrap();
    state.world.origin = [0.0; 3];
    state.world.extent = [1.0, 1.0, 2.0];
    state.world.cells = [4, 4, 8];
    for i in 0..8 {
        state.particles.pos[i] = [0.5, 0.5, 0.125 + 0.25 * i as f64];
        state.particles.radius[i] = 0.1;
    }
    state.setup_triaxial(20e3, -0.001).unwrap();

    let bytes = encode(&state, WireFormat::Legacy).unwrap();
    let back = decode(&bytes, SectionHints::default()).unwrap();

    assert_eq!(
        back.walls.mode,
        vec![
            WallMode::VelocityControlled,
            WallMode::StressControlled,
            WallMode::StressControlled,
            WallMode::StressControlled,
            WallMode::StressControlled,
        ]
    );
    assert_eq!(back.walls.normal[0], [0.0, 0.0, -1.0]);
}

// ─── Encoding Precondition Tests ──────────────────────────────

#[test]
fn encode_rejects_desynced_arrays() {
    let mut state = rich_state(3, 0, false, false);
    state.particles.radius.pop();
    let err = encode(&state, WireFormat::Legacy).unwrap_err();
    assert!(matches!(err, GranumError::Encoding(_)));
}

#[test]
fn encode_rejects_out_of_range_bond() {
    let mut state = rich_state(2, 0, false, false);
    state.enable_bonds().add_bond(ParticleId(0), ParticleId(9)).unwrap();
    let err = encode(&state, WireFormat::Legacy).unwrap_err();
    assert!(matches!(err, GranumError::Encoding(_)));
}

#[test]
fn encode_rejects_mismatched_fluid_shape() {
    let mut state = rich_state(2, 0, false, false);
    state.fluid = Some(FluidGrid::zeroed([2, 2, 2])); // world says 3×4×5
    let err = encode(&state, WireFormat::Legacy).unwrap_err();
    assert!(matches!(err, GranumError::Encoding(_)));
}
