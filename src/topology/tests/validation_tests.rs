use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::validation::{
    NonManifoldHandling, TopologyValidationOptions, validate_mesh, validate_mesh_topology,
};

// Two unit quads touching only at vertex 2.
fn bowtie_quads() -> PolyMesh {
    PolyMesh::from_vertices_and_faces(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 2.0, 0.0],
            [1.0, 2.0, 0.0],
        ],
        &[vec![0, 1, 2, 3], vec![2, 4, 5, 6]],
    )
    .expect("valid bowtie")
}

#[test]
fn bowtie_is_structurally_valid() {
    assert!(validate_mesh(&bowtie_quads()).is_ok());
}

#[test]
fn non_manifold_handling_modes() {
    let mesh = bowtie_quads();
    let mut opts = TopologyValidationOptions::default();
    assert!(validate_mesh_topology(&mesh, opts).is_ok());

    opts.non_manifold = NonManifoldHandling::Warn;
    assert!(validate_mesh_topology(&mesh, opts).is_ok());

    opts.non_manifold = NonManifoldHandling::Error;
    let err = validate_mesh_topology(&mesh, opts).unwrap_err();
    assert!(matches!(err, MeshPatternError::InvariantViolation(msg) if msg.contains("vertex 2")));
}

#[test]
fn require_quads_counts_offenders() {
    let mut mesh = bowtie_quads();
    let a = mesh.add_vertex([3.0, 3.0, 0.0]);
    let corner = crate::topology::point::VertexId::new(5);
    let top = crate::topology::point::VertexId::new(6);
    mesh.add_face(vec![top, corner, a]).unwrap();

    let opts = TopologyValidationOptions {
        require_quads: true,
        ..Default::default()
    };
    assert_eq!(
        validate_mesh_topology(&mesh, opts),
        Err(MeshPatternError::NotQuadMesh { non_quads: 1 })
    );
}

#[test]
fn isolated_vertices_are_reported() {
    let mut mesh = bowtie_quads();
    mesh.add_vertex([9.0, 9.0, 0.0]);
    let opts = TopologyValidationOptions {
        require_no_isolated_vertices: true,
        ..Default::default()
    };
    assert!(matches!(
        validate_mesh_topology(&mesh, opts),
        Err(MeshPatternError::InvariantViolation(_))
    ));
}
