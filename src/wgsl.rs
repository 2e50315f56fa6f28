//! Device-side declarations generated from the host tables.
//!
//! Kernels never spell out a struct layout or a binding number themselves;
//! they are compiled behind [`prelude`] so both sides come from one source.

use crate::bindings::{BufferIndex, BufferKind, TextureIndex, BUFFER_GROUP, TEXTURE_GROUP};
use crate::constants::LAYOUT_VERSION;
use crate::layout::{AgentVariables, CurrentTime, Particle, ParticleUniforms, Record, TrailFieldVariables};
use crate::passes::{Pass, TextureUse};

fn struct_decl<T: Record>() -> String {
    let mut out = format!("struct {} {{\n", T::NAME);
    for field in T::FIELDS {
        out.push_str(&format!("    {}: {},\n", field.name, field.ty.wgsl()));
    }
    out.push_str("}\n");
    out
}

/// Every shared record as a WGSL struct.
pub fn structs() -> String {
    [
        struct_decl::<AgentVariables>(),
        struct_decl::<TrailFieldVariables>(),
        struct_decl::<ParticleUniforms>(),
        struct_decl::<Particle>(),
        struct_decl::<CurrentTime>(),
    ]
    .join("\n")
}

pub fn slot_constants() -> String {
    let mut out = format!("const LAYOUT_VERSION: u32 = {}u;\n", LAYOUT_VERSION);
    for buffer in BufferIndex::ALL {
        out.push_str(&format!(
            "const {}_SLOT: u32 = {}u;\n",
            buffer.var_name().to_uppercase(),
            buffer.slot()
        ));
    }
    for texture in TextureIndex::ALL {
        out.push_str(&format!(
            "const {}_SLOT: u32 = {}u;\n",
            texture.var_name().to_uppercase(),
            texture.slot()
        ));
    }
    out
}

fn storage_format(texture: TextureIndex) -> &'static str {
    match texture {
        TextureIndex::Drawable | TextureIndex::Agents => "rgba8unorm",
        TextureIndex::CurrentTrailField | TextureIndex::PreviousTrailField => "r32float",
    }
}

fn buffer_decl(buffer: BufferIndex) -> String {
    let (space, ty) = match buffer.kind() {
        BufferKind::Uniform => ("uniform".to_string(), buffer.record().to_string()),
        BufferKind::Storage => (
            "storage, read_write".to_string(),
            format!("array<{}>", buffer.record()),
        ),
    };
    format!(
        "@group({}) @binding({}) var<{}> {}: {};\n",
        BUFFER_GROUP,
        buffer.slot(),
        space,
        buffer.var_name(),
        ty
    )
}

fn texture_decl(texture: TextureIndex, usage: TextureUse) -> String {
    let ty = match usage {
        TextureUse::Read => "texture_2d<f32>".to_string(),
        TextureUse::Write => format!("texture_storage_2d<{}, write>", storage_format(texture)),
        TextureUse::ReadWrite => format!("texture_storage_2d<{}, read_write>", storage_format(texture)),
    };
    format!(
        "@group({}) @binding({}) var {}: {};\n",
        TEXTURE_GROUP,
        texture.slot(),
        texture.var_name(),
        ty
    )
}

/// Declarations a kernel for `pass` is compiled against.
pub fn prelude(pass: Pass) -> String {
    let (x, y) = pass.workgroup_size();
    let mut out = format!(
        "// generated by ant-trails, layout version {}, pass: {}\n\n",
        LAYOUT_VERSION,
        pass.label()
    );
    out.push_str(&structs());
    out.push('\n');
    out.push_str(&slot_constants());
    out.push_str(&format!("const WORKGROUP_SIZE_X: u32 = {}u;\n", x));
    out.push_str(&format!("const WORKGROUP_SIZE_Y: u32 = {}u;\n\n", y));
    out.push_str("fn clamp_trail(value: f32) -> f32 {\n    return max(value, 0.0);\n}\n\n");
    for &buffer in pass.buffers() {
        out.push_str(&buffer_decl(buffer));
    }
    for &(texture, usage) in pass.textures() {
        out.push_str(&texture_decl(texture, usage));
    }
    out
}

/// Prelude followed by the caller's kernel source.
pub fn compose(pass: Pass, kernel: &str) -> String {
    let mut out = prelude(pass);
    out.push('\n');
    out.push_str(kernel);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLOR_FORMAT, TRAIL_FORMAT};

    #[test]
    fn agent_struct_matches_field_order() {
        let decl = struct_decl::<AgentVariables>();
        let count = decl.find("count: i32").unwrap();
        let size = decl.find("sensor_size: i32").unwrap();
        assert!(count < size);
        assert!(decl.starts_with("struct AgentVariables {"));
    }

    #[test]
    fn update_prelude_declares_its_bindings() {
        let source = prelude(Pass::UpdateAgents);
        assert!(source.contains("@group(0) @binding(0) var<uniform> agent_variables: AgentVariables;"));
        assert!(source.contains("@group(0) @binding(2) var<storage, read_write> particles: array<Particle>;"));
        assert!(source.contains("@group(0) @binding(3) var<uniform> current_time: CurrentTime;"));
        assert!(source.contains("@group(0) @binding(5) var<uniform> render_uniforms: ParticleUniforms;"));
        assert!(source.contains(
            "@group(1) @binding(2) var current_trails: texture_storage_2d<r32float, read_write>;"
        ));
        assert!(source.contains("@group(1) @binding(3) var previous_trails: texture_2d<f32>;"));
        assert!(!source.contains("var drawable"));
    }

    #[test]
    fn constants_cover_the_table() {
        let consts = slot_constants();
        assert!(consts.contains("const AGENT_VARIABLES_SLOT: u32 = 0u;"));
        assert!(consts.contains("const RENDER_UNIFORMS_SLOT: u32 = 5u;"));
        assert!(consts.contains("const PREVIOUS_TRAILS_SLOT: u32 = 3u;"));
    }

    #[test]
    fn storage_formats_follow_constants() {
        assert_eq!(COLOR_FORMAT, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(TRAIL_FORMAT, wgpu::TextureFormat::R32Float);
        assert_eq!(storage_format(TextureIndex::Agents), "rgba8unorm");
    }

    #[test]
    fn compose_appends_kernel() {
        let source = compose(Pass::ResetAgents, "@compute @workgroup_size(8, 8) fn reset_agents() {}");
        assert!(source.ends_with("fn reset_agents() {}"));
        assert!(source.contains("var agents: texture_storage_2d<rgba8unorm, write>;"));
    }

    #[test]
    fn field_preludes_clamp_trail_at_zero() {
        for pass in [Pass::Decay, Pass::UpdateAgents, Pass::Combine] {
            let source = prelude(pass);
            assert!(
                source.contains("fn clamp_trail(value: f32) -> f32 {\n    return max(value, 0.0);\n}"),
                "{} prelude lacks clamp_trail",
                pass.label()
            );
        }
    }

    #[test]
    fn combine_samples_the_current_field() {
        let source = prelude(Pass::Combine);
        assert!(source.contains("@group(1) @binding(2) var current_trails: texture_2d<f32>;"));
        assert!(!source.contains("previous_trails"));
    }

    #[test]
    fn every_prelude_compiles() {
        for pass in Pass::ALL {
            let kernel = format!(
                "@compute @workgroup_size(1)\nfn {}() {{\n    let trail = clamp_trail(-1.0f);\n}}\n",
                pass.entry_point()
            );
            let source = compose(pass, &kernel);
            let module = naga::front::wgsl::parse_str(&source)
                .unwrap_or_else(|err| panic!("{}: {}", pass.label(), err.emit_to_string(&source)));
            naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            )
            .validate(&module)
            .unwrap_or_else(|err| panic!("{}: {:?}", pass.label(), err));
        }
    }
}
