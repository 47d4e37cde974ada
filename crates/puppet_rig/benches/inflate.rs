//! Criterion benchmarks for hierarchy inflation.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use puppet_rig::prelude::*;

const LIMBS: [&str; 4] = ["LeftArm", "RightArm", "LeftLeg", "RightLeg"];

/// A humanoid-sized skeleton: a spine chain with four limbs of `depth`
/// bones each and five fingers per arm.
fn skeleton(depth: usize) -> SceneNode {
    let limb = |name: &str| {
        let mut bone = SceneNode::bone(format!("{}{}", name, depth));
        if name.ends_with("Arm") {
            let fingers = (0..5).map(|f| SceneNode::bone(format!("{}Finger{}", name, f)));
            bone = bone.with_children(fingers);
        }
        for d in (0..depth).rev() {
            bone = SceneNode::bone(format!("{}{}", name, d))
                .with_position(0.0, 0.1, 0.0)
                .with_child(bone);
        }
        bone
    };

    SceneNode::group("Scene").with_children([
        SceneNode::skinned_mesh("Wolf3D_Body"),
        SceneNode::skinned_mesh("Wolf3D_Hands"),
        SceneNode::bone("Hips").with_children(LIMBS.iter().map(|name| limb(*name))).with_child(
            SceneNode::bone("Spine").with_child(
                SceneNode::bone("Neck").with_child(
                    SceneNode::bone("Head")
                        .with_children([SceneNode::bone("LeftEye"), SceneNode::bone("RightEye")]),
                ),
            ),
        ),
    ])
}

fn bench_inflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inflate");
    group.sample_size(50);

    let config = RigConfig::default();
    let mut templates = TemplateRegistry::new();
    for name in ["Head", "LeftEye", "RightEye", "RightArm0"] {
        templates.register(EntityTemplate::new(name)).unwrap();
    }

    let humanoid = skeleton(12);

    // Benchmark: a few templated nodes in a ~80 bone skeleton.
    group.bench_function("humanoid_sparse_templates", |b| {
        b.iter_batched(
            || humanoid.duplicate(),
            |root| Inflator::new(&config, &templates).inflate(root),
            BatchSize::SmallInput,
        );
    });

    // Benchmark: nothing templated, only the root qualifies.
    group.bench_function("humanoid_no_templates", |b| {
        b.iter_batched(
            || humanoid.duplicate(),
            |root| Inflator::new(&config, &NoTemplates).inflate(root),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_inflate);
criterion_main!(benches);
