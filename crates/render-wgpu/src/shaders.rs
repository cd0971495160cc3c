/// Lit metallic surfaces with equirectangular environment reflections.
/// Writes linear HDR colour; tone mapping happens in the composite pass.
pub const SCENE_SHADER: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    ambient: vec4<f32>,
    key_dir: vec4<f32>,
    key_color: vec4<f32>,
    fill_pos: vec4<f32>,
    fill_color: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> scene: Scene;
@group(0) @binding(1) var env_map: texture_2d<f32>;
@group(1) @binding(0) var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) base_color: vec4<f32>,
    @location(3) surface: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) base_color: vec4<f32>,
    @location(3) surface: vec4<f32>,
};

const PI: f32 = 3.14159265;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = scene.view_proj * world;
    out.world_pos = world.xyz;
    out.world_normal = normalize((object.normal * vec4<f32>(in.normal, 0.0)).xyz);
    out.base_color = in.base_color;
    out.surface = in.surface;
    return out;
}

fn sample_env(dir: vec3<f32>) -> vec3<f32> {
    let size = textureDimensions(env_map);
    let u = 0.5 + atan2(dir.x, -dir.z) / (2.0 * PI);
    let v = acos(clamp(dir.y, -1.0, 1.0)) / PI;
    let x = min(u32(u * f32(size.x)), size.x - 1u);
    let y = min(u32(v * f32(size.y)), size.y - 1u);
    return textureLoad(env_map, vec2<u32>(x, y), 0).rgb;
}

fn specular(n: vec3<f32>, v: vec3<f32>, l: vec3<f32>, roughness: f32) -> f32 {
    let h = normalize(v + l);
    let a = max(roughness * roughness, 0.002);
    let a2 = a * a;
    let nh = max(dot(n, h), 0.0);
    let d = nh * nh * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d);
}

fn fresnel(f0: vec3<f32>, cos_theta: f32) -> vec3<f32> {
    return f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - cos_theta, 5.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(scene.eye.xyz - in.world_pos);
    let metalness = in.surface.x;
    let roughness = clamp(in.surface.y, 0.0, 1.0);
    let env_intensity = in.surface.z;
    let albedo = in.base_color.rgb;

    let f0 = mix(vec3<f32>(0.04), albedo, metalness);
    let diffuse_color = albedo * (1.0 - metalness);
    let nv = max(dot(n, v), 0.0);

    var color = scene.ambient.rgb * diffuse_color;

    let key_l = normalize(scene.key_dir.xyz);
    let key_nl = max(dot(n, key_l), 0.0);
    color += (diffuse_color / PI + fresnel(f0, nv) * specular(n, v, key_l, roughness) * 0.25)
        * scene.key_color.rgb * key_nl;

    let to_fill = scene.fill_pos.xyz - in.world_pos;
    let fill_l = normalize(to_fill);
    let fill_nl = max(dot(n, fill_l), 0.0);
    let falloff = 1.0 / max(dot(to_fill, to_fill), 0.01);
    color += (diffuse_color / PI + fresnel(f0, nv) * specular(n, v, fill_l, roughness) * 0.25)
        * scene.fill_color.rgb * fill_nl * falloff;

    let r = reflect(-v, n);
    color += sample_env(r) * fresnel(f0, nv) * env_intensity * (1.0 - roughness * 0.5);

    return vec4<f32>(color, in.base_color.a);
}
"#;

/// Full-screen composite: RGB shift, exposure, ACES filmic tone mapping.
/// The surface is sRGB so the hardware applies the output transfer.
pub const POST_SHADER: &str = r#"
struct Post {
    shift: vec2<f32>,
    exposure: f32,
    tone_mapping: u32,
};

@group(0) @binding(0) var scene_color: texture_2d<f32>;
@group(0) @binding(1) var scene_sampler: sampler;
@group(0) @binding(2) var<uniform> post: Post;

struct FullscreenOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let xy = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.clip_position = vec4<f32>(xy * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(xy.x, 1.0 - xy.y);
    return out;
}

fn aces_filmic(x: vec3<f32>) -> vec3<f32> {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    return clamp((x * (a * x + b)) / (x * (c * x + d) + e), vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_composite(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let center = textureSample(scene_color, scene_sampler, in.uv);
    let r = textureSample(scene_color, scene_sampler, in.uv + post.shift).r;
    let b = textureSample(scene_color, scene_sampler, in.uv - post.shift).b;
    var rgb = vec3<f32>(r, center.g, b) * post.exposure;
    if post.tone_mapping == 1u {
        rgb = aces_filmic(rgb);
    }
    return vec4<f32>(rgb * center.a, center.a);
}
"#;
