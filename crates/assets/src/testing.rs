//! Model fixtures for tests, here and in dependent crates through the
//! `test-fixtures` feature.

fn push_f32s(bin: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        bin.extend_from_slice(&v.to_le_bytes());
    }
}

fn pad(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

/// A tiny skinned GLB: one triangle bound to a single joint that slides
/// along +Y in a two-key "Idle" clip.
pub fn skinned_triangle_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    // 0: positions
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    // 36: normals
    push_f32s(&mut bin, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    // 72: joints
    for _ in 0..3 {
        for j in [0u16, 0, 0, 0] {
            bin.extend_from_slice(&j.to_le_bytes());
        }
    }
    // 96: weights
    for _ in 0..3 {
        push_f32s(&mut bin, &[1.0, 0.0, 0.0, 0.0]);
    }
    // 144: indices
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    pad(&mut bin, 0);
    // 152: inverse bind matrix (joint sits at x=1 in bind pose)
    push_f32s(
        &mut bin,
        &[
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 1.0,
        ],
    );
    // 216: key times
    push_f32s(&mut bin, &[0.0, 1.0]);
    // 224: key translations
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
    debug_assert_eq!(bin.len(), 248);

    let json = r#"{
      "asset": { "version": "2.0" },
      "scene": 0,
      "scenes": [ { "nodes": [0, 2] } ],
      "nodes": [
        { "name": "Body", "mesh": 0, "skin": 0 },
        { "name": "Hips" },
        { "name": "Armature", "children": [1], "translation": [1.0, 0.0, 0.0] }
      ],
      "skins": [ { "joints": [1], "inverseBindMatrices": 5 } ],
      "materials": [ { "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] } } ],
      "meshes": [ { "name": "Body", "primitives": [ {
        "attributes": { "POSITION": 0, "NORMAL": 1, "JOINTS_0": 2, "WEIGHTS_0": 3 },
        "indices": 4, "material": 0 } ] } ],
      "animations": [ {
        "name": "Idle",
        "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
        "samplers": [ { "input": 6, "output": 7, "interpolation": "LINEAR" } ]
      } ],
      "buffers": [ { "byteLength": 248 } ],
      "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
        { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
        { "buffer": 0, "byteOffset": 72, "byteLength": 24 },
        { "buffer": 0, "byteOffset": 96, "byteLength": 48 },
        { "buffer": 0, "byteOffset": 144, "byteLength": 6 },
        { "buffer": 0, "byteOffset": 152, "byteLength": 64 },
        { "buffer": 0, "byteOffset": 216, "byteLength": 8 },
        { "buffer": 0, "byteOffset": 224, "byteLength": 24 }
      ],
      "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
          "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
        { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
        { "bufferView": 2, "componentType": 5123, "count": 3, "type": "VEC4" },
        { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC4" },
        { "bufferView": 4, "componentType": 5123, "count": 3, "type": "SCALAR" },
        { "bufferView": 5, "componentType": 5126, "count": 1, "type": "MAT4" },
        { "bufferView": 6, "componentType": 5126, "count": 2, "type": "SCALAR",
          "min": [0.0], "max": [1.0] },
        { "bufferView": 7, "componentType": 5126, "count": 2, "type": "VEC3" }
      ]
    }"#;
    let mut json = json.as_bytes().to_vec();
    pad(&mut json, b' ');

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}
