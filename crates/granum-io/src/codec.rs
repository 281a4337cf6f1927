//! Encode/decode of the simulator's state-snapshot format.
//!
//! The layout is positional and little-endian: a fixed field order with
//! variable-length sections sized by the leading count fields. Two
//! sections (bonds, fluid grid) are conditional, and in the legacy
//! format their presence is NOT recorded in the stream — the decoder
//! must be told out-of-band via [`SectionHints`]. New files should use
//! [`WireFormat::Envelope`], which prefixes the identical body with a
//! magic, a format-version byte, and a section-presence flags byte;
//! [`decode`] recognizes the envelope automatically.
//!
//! Groups of fields are interleaved per element exactly where the
//! simulator interleaves them (position+radius, velocity+fixed-velocity,
//! wall normal+position); everything else is written in block form.
//! Getting this wrong does not fail loudly — it silently corrupts a
//! physics run — which is why the round-trip tests pin the layout down
//! to the byte.

use granum_state::{
    BondGraph, ContactModel, FluidGrid, MaterialParams, Particles, Periodicity, SimState,
    Temporal, WallMode, Walls, WorldGrid,
};
use granum_types::constants::{DIM, MAX_WALLS};
use granum_types::{GranumError, GranumResult};
use std::path::Path;

use crate::wire::{ByteReader, ByteWriter};

/// Magic prefix of the self-describing envelope.
pub const STATE_MAGIC: [u8; 4] = *b"GRNM";

/// Current envelope format version.
pub const STATE_FORMAT_VERSION: u8 = 1;

/// Envelope flag bit: bond section present.
const FLAG_BONDS: u8 = 0b0000_0001;
/// Envelope flag bit: fluid section present.
const FLAG_FLUID: u8 = 0b0000_0010;

/// Wire bytes per particle across all per-particle sections.
const PARTICLE_WIRE_BYTES: usize = 216;
/// Wire bytes per bond across all per-bond arrays.
const BOND_WIRE_BYTES: usize = 72;
/// Wire bytes per fluid cell.
const FLUID_CELL_WIRE_BYTES: usize = 48;

/// Output format selector for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// The raw positional layout the compiled simulator consumes.
    /// Section presence is not recorded; readers need [`SectionHints`].
    Legacy,
    /// Magic + version byte + section-flags byte, then the legacy body.
    Envelope,
}

/// Out-of-band section presence for decoding legacy streams.
///
/// A wrong hint desynchronizes the read: the decoder will either fail
/// with a length mismatch or produce a structurally different state —
/// it can never silently reproduce the correctly-hinted result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionHints {
    /// Expect the bond section.
    pub bonds: bool,
    /// Expect the fluid grid section.
    pub fluid: bool,
}

impl SectionHints {
    /// Hints matching a given state's sections.
    pub fn for_state(state: &SimState) -> Self {
        Self {
            bonds: state.bonds.is_some(),
            fluid: state.fluid.is_some(),
        }
    }
}

// ─── Encoding ─────────────────────────────────────────────────

/// Serializes a state.
///
/// Deterministic: identical state content yields identical bytes. Fails
/// with an `Encoding` error if any array length disagrees with its
/// declared count or a bond endpoint is out of range.
pub fn encode(state: &SimState, format: WireFormat) -> GranumResult<Vec<u8>> {
    state
        .validate()
        .map_err(|e| GranumError::Encoding(e.to_string()))?;

    let mut w = ByteWriter::with_capacity(encoded_len(state, format));

    if format == WireFormat::Envelope {
        w.bytes(&STATE_MAGIC);
        w.u8(STATE_FORMAT_VERSION);
        let mut flags = 0u8;
        if state.bonds.is_some() {
            flags |= FLAG_BONDS;
        }
        if state.fluid.is_some() {
            flags |= FLAG_FLUID;
        }
        w.u8(flags);
    }

    encode_body(state, &mut w);
    Ok(w.into_bytes())
}

/// Exact byte length of the encoded state.
fn encoded_len(state: &SimState, format: WireFormat) -> usize {
    let n = state.particle_count();
    let nw = state.wall_count();
    let mut len = 8 + 36 + 64 + n * PARTICLE_WIRE_BYTES + 164 + 20 + nw * 68 + 8;
    if let Some(ref bonds) = state.bonds {
        len += 28 + bonds.len() * BOND_WIRE_BYTES;
    }
    if let Some(ref fluid) = state.fluid {
        len += fluid.cell_count() * FLUID_CELL_WIRE_BYTES;
    }
    if format == WireFormat::Envelope {
        len += 6;
    }
    len
}

fn encode_body(state: &SimState, w: &mut ByteWriter) {
    let p = &state.particles;
    let n = p.len();

    // Counts
    w.i32(DIM as i32);
    w.u32(n as u32);

    // Temporal
    w.f64(state.time.dt);
    w.f64(state.time.current);
    w.f64(state.time.total);
    w.f64(state.time.file_interval);
    w.u32(state.time.step_count);

    // World
    w.f64_3(&state.world.origin);
    w.f64_3(&state.world.extent);
    for c in state.world.cells {
        w.u32(c);
    }
    w.i32(state.world.periodic.to_wire());

    // Position and radius, interleaved per particle
    for i in 0..n {
        w.f64_3(&p.pos[i]);
        w.f64(p.radius[i]);
    }

    // Lateral displacement, block form
    for d in &p.lateral_disp {
        w.f64_2(d);
    }

    // Velocity and fixed-velocity flag, interleaved per particle
    for i in 0..n {
        w.f64_3(&p.vel[i]);
        w.f64(p.fixed_vel[i]);
    }

    // Remaining vector arrays, block form
    w.f64_3_block(&p.force);
    w.f64_3_block(&p.ang_pos);
    w.f64_3_block(&p.ang_vel);
    w.f64_3_block(&p.torque);

    // Per-particle scalars, block form
    w.f64_block(&p.shear_diss_rate);
    w.f64_block(&p.shear_diss);
    w.f64_block(&p.visc_diss_rate);
    w.f64_block(&p.visc_diss);
    w.f64_block(&p.pressure);

    // Global material parameters, fixed order
    let m = &state.params;
    w.f64_3(&m.g);
    w.f64(m.k_n);
    w.f64(m.k_t);
    w.f64(m.k_r);
    w.f64(m.gamma_n);
    w.f64(m.gamma_t);
    w.f64(m.gamma_r);
    w.f64(m.mu_s);
    w.f64(m.mu_d);
    w.f64(m.mu_r);
    w.f64(m.gamma_wn);
    w.f64(m.gamma_wt);
    w.f64(m.mu_ws);
    w.f64(m.mu_wd);
    w.f64(m.rho);
    w.u32(m.contact_model.to_wire());
    w.f64(m.kappa);
    w.f64(m.debond_dist);
    w.f64(m.v_b);

    // Wall section
    let walls = &state.walls;
    let nw = walls.len();
    w.u32(nw as u32);
    for mode in &walls.mode {
        w.i32(mode.to_wire());
    }
    for i in 0..nw {
        w.f64_3(&walls.normal[i]);
        w.f64(walls.pos[i]);
    }
    for i in 0..nw {
        w.f64(walls.mass[i]);
        w.f64(walls.vel[i]);
        w.f64(walls.force[i]);
        w.f64(walls.stress_target[i]);
    }
    w.f64(walls.osc_amplitude);
    w.f64(walls.osc_frequency);

    // Bond section, present only when bonds are enabled
    if let Some(ref bonds) = state.bonds {
        w.f64(bonds.radius_multiplier);
        w.u32(bonds.len() as u32);
        w.f64(bonds.strength_normal);
        w.f64(bonds.strength_shear);
        for pair in &bonds.pairs {
            w.u32(pair[0]);
            w.u32(pair[1]);
        }
        w.f64_block(&bonds.normal_disp);
        w.f64_3_block(&bonds.tangential_disp);
        w.f64_block(&bonds.normal_rot);
        w.f64_3_block(&bonds.tangential_rot);
    }

    // Fluid viscosity is always on the wire, grid or not
    w.f64(m.nu);

    // Fluid grid, x varying fastest
    if let Some(ref fluid) = state.fluid {
        let [nx, ny, nz] = fluid.cells.map(|c| c as usize);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let c = fluid.idx(x, y, z);
                    w.f64_3(&fluid.velocity[c]);
                    w.f64(fluid.pressure[c]);
                    w.f64(fluid.porosity[c]);
                    w.f64(fluid.porosity_rate[c]);
                }
            }
        }
    }
}

// ─── Decoding ─────────────────────────────────────────────────

/// Deserializes a state.
///
/// Recognizes the self-describing envelope by its magic prefix and then
/// ignores `hints`; a stream without the magic is decoded as legacy
/// using the caller-supplied hints. Fails with a `Decoding` error on a
/// truncated stream, an implausible count, an unknown enum value, or
/// trailing bytes after the expected end.
pub fn decode(data: &[u8], hints: SectionHints) -> GranumResult<SimState> {
    let mut r = ByteReader::new(data);

    let hints = if r.peek(4) == Some(STATE_MAGIC.as_slice()) {
        r.bytes(4)?;
        let version = r.u8()?;
        if version != STATE_FORMAT_VERSION {
            return Err(GranumError::Decoding(format!(
                "unsupported format version {version}"
            )));
        }
        let flags = r.u8()?;
        SectionHints {
            bonds: flags & FLAG_BONDS != 0,
            fluid: flags & FLAG_FLUID != 0,
        }
    } else {
        hints
    };

    let state = decode_body(&mut r, hints)?;

    if !r.is_at_end() {
        return Err(GranumError::Decoding(format!(
            "{} trailing bytes after state at byte {}",
            r.remaining(),
            r.offset()
        )));
    }

    // A decoded state must satisfy the same invariants as a constructed
    // one; a violation here means the stream was inconsistent.
    state
        .validate()
        .map_err(|e| GranumError::Decoding(e.to_string()))?;
    Ok(state)
}

fn decode_body(r: &mut ByteReader<'_>, hints: SectionHints) -> GranumResult<SimState> {
    // Counts
    let nd = r.i32()?;
    if nd != DIM as i32 {
        return Err(GranumError::Decoding(format!(
            "unsupported dimensionality {nd}, expected {DIM}"
        )));
    }
    let n = r.u32()? as usize;

    // Temporal
    let time = Temporal {
        dt: r.f64()?,
        current: r.f64()?,
        total: r.f64()?,
        file_interval: r.f64()?,
        step_count: r.u32()?,
    };

    // World
    let world = WorldGrid {
        origin: r.f64_3()?,
        extent: r.f64_3()?,
        cells: [r.u32()?, r.u32()?, r.u32()?],
        periodic: Periodicity::from_wire(r.i32()?)?,
    };

    // Reject an implausible particle count before allocating anything.
    r.ensure(n * PARTICLE_WIRE_BYTES)?;
    let mut p = Particles::with_count(0);

    // Position and radius, interleaved per particle
    for _ in 0..n {
        p.pos.push(r.f64_3()?);
        p.radius.push(r.f64()?);
    }

    // Lateral displacement, block form
    for _ in 0..n {
        p.lateral_disp.push(r.f64_2()?);
    }

    // Velocity and fixed-velocity flag, interleaved per particle
    for _ in 0..n {
        p.vel.push(r.f64_3()?);
        p.fixed_vel.push(r.f64()?);
    }

    // Remaining vector arrays, block form
    p.force = r.f64_3_block(n)?;
    p.ang_pos = r.f64_3_block(n)?;
    p.ang_vel = r.f64_3_block(n)?;
    p.torque = r.f64_3_block(n)?;

    // Per-particle scalars, block form
    p.shear_diss_rate = r.f64_block(n)?;
    p.shear_diss = r.f64_block(n)?;
    p.visc_diss_rate = r.f64_block(n)?;
    p.visc_diss = r.f64_block(n)?;
    p.pressure = r.f64_block(n)?;

    // Global material parameters, fixed order
    let mut params = MaterialParams {
        g: r.f64_3()?,
        k_n: r.f64()?,
        k_t: r.f64()?,
        k_r: r.f64()?,
        gamma_n: r.f64()?,
        gamma_t: r.f64()?,
        gamma_r: r.f64()?,
        mu_s: r.f64()?,
        mu_d: r.f64()?,
        mu_r: r.f64()?,
        gamma_wn: r.f64()?,
        gamma_wt: r.f64()?,
        mu_ws: r.f64()?,
        mu_wd: r.f64()?,
        rho: r.f64()?,
        contact_model: ContactModel::from_wire(r.u32()?)?,
        kappa: r.f64()?,
        debond_dist: r.f64()?,
        v_b: r.f64()?,
        nu: 0.0, // read after the wall (and bond) sections
    };

    // Wall section
    let nw = r.u32()? as usize;
    if nw > MAX_WALLS {
        return Err(GranumError::Decoding(format!(
            "wall count {nw} exceeds maximum {MAX_WALLS}"
        )));
    }
    let mut walls = Walls::empty();
    for _ in 0..nw {
        walls.mode.push(WallMode::from_wire(r.i32()?)?);
    }
    for _ in 0..nw {
        walls.normal.push(r.f64_3()?);
        walls.pos.push(r.f64()?);
    }
    for _ in 0..nw {
        walls.mass.push(r.f64()?);
        walls.vel.push(r.f64()?);
        walls.force.push(r.f64()?);
        walls.stress_target.push(r.f64()?);
    }
    walls.osc_amplitude = r.f64()?;
    walls.osc_frequency = r.f64()?;

    // Bond section, only when hinted
    let bonds = if hints.bonds {
        let radius_multiplier = r.f64()?;
        let b = r.u32()? as usize;
        let strength_normal = r.f64()?;
        let strength_shear = r.f64()?;
        r.ensure(b * BOND_WIRE_BYTES)?;
        let mut pairs = Vec::with_capacity(b);
        for _ in 0..b {
            pairs.push([r.u32()?, r.u32()?]);
        }
        Some(BondGraph {
            radius_multiplier,
            strength_normal,
            strength_shear,
            pairs,
            normal_disp: r.f64_block(b)?,
            tangential_disp: r.f64_3_block(b)?,
            normal_rot: r.f64_block(b)?,
            tangential_rot: r.f64_3_block(b)?,
        })
    } else {
        None
    };

    // Fluid viscosity, always present
    params.nu = r.f64()?;

    // Fluid grid, only when hinted; shape comes from the world cells
    let fluid = if hints.fluid {
        let cell_count = world.cell_count();
        r.ensure(cell_count * FLUID_CELL_WIRE_BYTES)?;
        let mut fluid = FluidGrid::zeroed(world.cells);
        let [nx, ny, nz] = world.cells.map(|c| c as usize);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let c = fluid.idx(x, y, z);
                    fluid.velocity[c] = r.f64_3()?;
                    fluid.pressure[c] = r.f64()?;
                    fluid.porosity[c] = r.f64()?;
                    fluid.porosity_rate[c] = r.f64()?;
                }
            }
        }
        Some(fluid)
    } else {
        None
    };

    Ok(SimState {
        world,
        time,
        particles: p,
        params,
        walls,
        bonds,
        fluid,
    })
}

// ─── File Helpers ─────────────────────────────────────────────

/// Encodes a state and writes it to `path`.
pub fn encode_file(state: &SimState, path: &Path, format: WireFormat) -> GranumResult<()> {
    let bytes = encode(state, format)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        particles = state.particle_count(),
        "wrote state file"
    );
    Ok(())
}

/// Reads and decodes a state file.
pub fn decode_file(path: &Path, hints: SectionHints) -> GranumResult<SimState> {
    let bytes = std::fs::read(path)?;
    let state = decode(&bytes, hints)?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        particles = state.particle_count(),
        "read state file"
    );
    Ok(state)
}
