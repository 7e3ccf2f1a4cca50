//! Model container and the fixed shell-roof model builder

use std::collections::BTreeMap;

use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::elements::{
    Element, ElementId, FiberSection, LayeredShell, Material, MaterialTag, Node, NodeId, Section,
    SectionTag, ShellLayer, SofteningLaw, Support,
};
use crate::error::{GeometryError, PushoverError, PushoverResult};
use crate::geometry::SurfacePatch;

/// Material set used for the concrete shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialModel {
    /// Elastic-isotropic shell and elastic rebar steel
    Linear,
    /// Damage-plasticity shell concrete and hardening rebar steel
    Nonlinear,
}

impl MaterialModel {
    /// Suffix used in result file names
    pub fn suffix(self) -> &'static str {
        match self {
            MaterialModel::Linear => "linear",
            MaterialModel::Nonlinear => "nonlinear",
        }
    }
}

/// Material and section tags of the fixed model
pub mod tags {
    use crate::elements::{MaterialTag, SectionTag};

    pub const SHELL_CONCRETE: MaterialTag = 1;
    pub const REBAR_STEEL: MaterialTag = 2;
    pub const REBAR_LAYER_0: MaterialTag = 3;
    pub const REBAR_LAYER_90: MaterialTag = 4;
    pub const EDGE_CONCRETE: MaterialTag = 6;

    pub const SHELL_SECTION: SectionTag = 1;
    pub const EDGE_SECTION: SectionTag = 5;
}

/// A fully defined, solver-ready structural model.
///
/// A model is built fresh for every load step, handed to the engine once,
/// read for displacements and discarded; nothing carries over between
/// steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    nodes: BTreeMap<NodeId, Node>,
    elements: BTreeMap<ElementId, Element>,
    materials: BTreeMap<MaterialTag, Material>,
    sections: BTreeMap<SectionTag, Section>,
    supports: BTreeMap<NodeId, Support>,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material definition under `tag`
    pub fn add_material(&mut self, tag: MaterialTag, material: Material) -> PushoverResult<()> {
        if self.materials.contains_key(&tag) {
            return Err(PushoverError::DuplicateMaterial(tag));
        }
        if let Material::RebarLayer { steel, .. } = material {
            if !self.materials.contains_key(&steel) {
                return Err(PushoverError::MaterialNotFound(steel));
            }
        }
        self.materials.insert(tag, material);
        Ok(())
    }

    /// Add a section under `tag`; every referenced material must exist
    pub fn add_section(&mut self, tag: SectionTag, section: Section) -> PushoverResult<()> {
        if self.sections.contains_key(&tag) {
            return Err(PushoverError::DuplicateSection(tag));
        }
        for material in section.material_tags() {
            if !self.materials.contains_key(&material) {
                return Err(PushoverError::MaterialNotFound(material));
            }
        }
        self.sections.insert(tag, section);
        Ok(())
    }

    /// Add a node; its id must be unused
    pub fn add_node(&mut self, node: Node) -> PushoverResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(PushoverError::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Add an element; its nodes and section must exist
    pub fn add_element(&mut self, id: ElementId, element: Element) -> PushoverResult<()> {
        if self.elements.contains_key(&id) {
            return Err(PushoverError::DuplicateElement(id));
        }
        for &node in element.nodes() {
            if !self.nodes.contains_key(&node) {
                return Err(PushoverError::NodeNotFound(node));
            }
        }
        if !self.sections.contains_key(&element.section()) {
            return Err(PushoverError::SectionNotFound(element.section()));
        }
        self.elements.insert(id, element);
        Ok(())
    }

    /// Fix all six DOF at every node lying on the elevation plane `z`.
    /// Returns the number of nodes fixed.
    pub fn fix_z(&mut self, z: f64) -> usize {
        const PLANE_TOL: f64 = 1e-9;
        let matched: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| (n.position.z - z).abs() <= PLANE_TOL)
            .map(|n| n.id)
            .collect();
        for &id in &matched {
            self.supports.insert(id, Support::fixed());
        }
        matched.len()
    }

    /// Fix all six DOF at every node whose coordinates all lie within `tol`
    /// of `target`. Matching is per-axis (a box, not a sphere); zero matches
    /// fix nothing and return 0 so callers can assert the boundary condition
    /// actually landed.
    pub fn fix_near(&mut self, target: Point3<f64>, tol: f64) -> usize {
        let matched: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.within(&target, tol))
            .map(|n| n.id)
            .collect();
        for &id in &matched {
            self.supports.insert(id, Support::fixed());
        }
        matched.len()
    }

    /// Nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Node ids in ascending order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Elements as (id, element) in id order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements.iter().map(|(id, e)| (*id, e))
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Materials as (tag, material) in tag order
    pub fn materials(&self) -> impl Iterator<Item = (MaterialTag, &Material)> + '_ {
        self.materials.iter().map(|(tag, m)| (*tag, m))
    }

    /// Sections as (tag, section) in tag order
    pub fn sections(&self) -> impl Iterator<Item = (SectionTag, &Section)> + '_ {
        self.sections.iter().map(|(tag, s)| (*tag, s))
    }

    /// Supports as (node id, support) in node-id order
    pub fn supports(&self) -> impl Iterator<Item = (NodeId, Support)> + '_ {
        self.supports.iter().map(|(id, s)| (*id, *s))
    }

    pub fn support(&self, node: NodeId) -> Option<Support> {
        self.supports.get(&node).copied()
    }
}

/// Builds the fixed four-corner shell model: materials and sections, a
/// 10x10 structured mesh, the optional perimeter frame, and all boundary
/// conditions. `build` is pure; two calls yield identical models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelBuilder {
    mode: MaterialModel,
    frame_edges: bool,
}

impl ModelBuilder {
    /// Plan dimensions are surveyed in feet; the model works in inches
    const IN_PER_FT: f64 = 12.0;

    const NX: usize = 10;
    const NY: usize = 10;
    const FIRST_NODE: NodeId = 1;

    // shell stack, inches
    const COVER: f64 = 1.25;
    const REBAR: f64 = 1.0;
    const TOTAL_DEPTH: f64 = 6.0;

    // ksi
    const E_CONCRETE: f64 = 3600.0;
    const NU_CONCRETE: f64 = 0.2;
    const E_STEEL: f64 = 30_000.0;
    const FY_STEEL: f64 = 60.0;
    const STEEL_HARDENING: f64 = 0.01;

    /// The four surveyed corner points of the roof surface, cyclic order
    fn corners() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-33.282 * Self::IN_PER_FT, 0.0, 49.923 * Self::IN_PER_FT),
            Point3::new(0.0, 0.0, 72.111 * Self::IN_PER_FT),
            Point3::new(33.282 * Self::IN_PER_FT, 0.0, 22.077 * Self::IN_PER_FT),
        ]
    }

    /// Ridge support target: mid-height of the long diagonal
    fn ridge_target() -> Point3<f64> {
        Point3::new(0.0, 0.0, 36.0555 * Self::IN_PER_FT)
    }

    pub fn new(mode: MaterialModel) -> Self {
        Self {
            mode,
            frame_edges: true,
        }
    }

    pub fn mode(&self) -> MaterialModel {
        self.mode
    }

    /// Frame the mesh perimeter with fiber-section members (on by default)
    pub fn frame_edges(mut self, frame: bool) -> Self {
        self.frame_edges = frame;
        self
    }

    /// Realize a solver-ready model. Each stage is a precondition for the
    /// next: materials and sections first, then the mesh, then the edge
    /// frame, then boundary conditions.
    pub fn build(&self) -> PushoverResult<Model> {
        let mut model = Model::new();
        self.define_materials(&mut model)?;
        self.define_sections(&mut model)?;

        let grid = SurfacePatch::new(Self::corners()).mesh(Self::NX, Self::NY, Self::FIRST_NODE)?;
        for &(id, position) in grid.nodes() {
            model.add_node(Node::at(id, position))?;
        }

        let mut next_element: ElementId = 1;
        for &quad in grid.quads() {
            model.add_element(
                next_element,
                Element::Shell {
                    nodes: quad,
                    section: tags::SHELL_SECTION,
                },
            )?;
            next_element += 1;
        }

        if self.frame_edges {
            let walk = grid.edge_walk();
            for k in 0..walk.len() {
                let pair = [walk[k], walk[(k + 1) % walk.len()]];
                model.add_element(
                    next_element,
                    Element::Frame {
                        nodes: pair,
                        section: tags::EDGE_SECTION,
                        vertical: [0.0, 0.0, 1.0],
                    },
                )?;
                next_element += 1;
            }
        }

        self.apply_boundaries(&mut model)?;
        Ok(model)
    }

    fn define_materials(&self, model: &mut Model) -> PushoverResult<()> {
        match self.mode {
            MaterialModel::Linear => {
                model.add_material(
                    tags::SHELL_CONCRETE,
                    Material::ElasticIsotropic {
                        e: Self::E_CONCRETE,
                        nu: Self::NU_CONCRETE,
                    },
                )?;
                model.add_material(tags::REBAR_STEEL, Material::Elastic { e: Self::E_STEEL })?;
            }
            MaterialModel::Nonlinear => {
                model.add_material(tags::SHELL_CONCRETE, shell_damage_concrete()?)?;
                model.add_material(
                    tags::REBAR_STEEL,
                    Material::Steel {
                        fy: Self::FY_STEEL,
                        e: Self::E_STEEL,
                        hardening: Self::STEEL_HARDENING,
                    },
                )?;
            }
        }
        model.add_material(
            tags::REBAR_LAYER_0,
            Material::RebarLayer {
                steel: tags::REBAR_STEEL,
                angle_deg: 0.0,
            },
        )?;
        model.add_material(
            tags::REBAR_LAYER_90,
            Material::RebarLayer {
                steel: tags::REBAR_STEEL,
                angle_deg: 90.0,
            },
        )?;
        model.add_material(
            tags::EDGE_CONCRETE,
            Material::Concrete {
                fpc: -6.0,
                epsc0: -0.004,
                fpcu: -5.0,
                epsu: -0.014,
            },
        )?;
        Ok(())
    }

    fn define_sections(&self, model: &mut Model) -> PushoverResult<()> {
        let core = Self::TOTAL_DEPTH - 2.0 * Self::COVER - 2.0 * Self::REBAR;
        let stack = vec![
            ShellLayer {
                material: tags::SHELL_CONCRETE,
                thickness: Self::COVER,
            },
            ShellLayer {
                material: tags::REBAR_LAYER_0,
                thickness: Self::REBAR,
            },
            ShellLayer {
                material: tags::REBAR_LAYER_90,
                thickness: Self::REBAR,
            },
            ShellLayer {
                material: tags::SHELL_CONCRETE,
                thickness: core,
            },
            ShellLayer {
                material: tags::REBAR_LAYER_90,
                thickness: Self::REBAR,
            },
            ShellLayer {
                material: tags::REBAR_LAYER_0,
                thickness: Self::REBAR,
            },
            ShellLayer {
                material: tags::SHELL_CONCRETE,
                thickness: Self::COVER,
            },
        ];
        model.add_section(tags::SHELL_SECTION, Section::LayeredShell(LayeredShell::new(stack)))?;

        let edge = FiberSection::new(1.0).with_rect_patch(
            tags::EDGE_CONCRETE,
            10,
            10,
            (-0.5, -0.5),
            (0.5, 0.5),
        );
        model.add_section(tags::EDGE_SECTION, Section::Fiber(edge))?;
        Ok(())
    }

    fn apply_boundaries(&self, model: &mut Model) -> PushoverResult<()> {
        let [c1, c2, c3, c4] = Self::corners();

        for z in [c1.z, c3.z] {
            if model.fix_z(z) == 0 {
                return Err(GeometryError::UnmatchedPlane { z }.into());
            }
        }

        for (target, tol) in [(c2, 0.1), (c4, 0.1), (Self::ridge_target(), 1.0)] {
            let matched = model.fix_near(target, tol);
            if matched == 0 {
                return Err(GeometryError::NoNodesMatched {
                    x: target.x,
                    y: target.y,
                    z: target.z,
                    tol,
                }
                .into());
            }
            debug!(
                "fixed {matched} node(s) near ({:.3}, {:.3}, {:.3})",
                target.x, target.y, target.z
            );
        }
        Ok(())
    }
}

/// The tabulated damage-plasticity law for the shell concrete. Tension
/// softens past ~3 ksi; compression follows a parabolic rise to 30 ksi
/// before crushing. Damage tables carry the calibrated stiffness loss.
fn shell_damage_concrete() -> PushoverResult<Material> {
    let tension = SofteningLaw::new(
        vec![0.0, 9e-05, 0.00015, 0.00507, 0.0250501, 0.250501],
        vec![0.0, 2.7, 3.0, 0.6, 0.003, 0.003],
        vec![
            0.0,
            0.0,
            0.0,
            0.960552268244576,
            0.9999800399998403,
            0.9999995660869531,
        ],
    )?;
    let compression = SofteningLaw::new(
        vec![
            0.0,
            0.0005,
            0.0006666666666666666,
            0.0008333333333333333,
            0.001,
            0.0011666666666666665,
            0.0013333333333333333,
            0.0015,
            0.0016666666666666666,
            0.0018333333333333333,
            0.002,
            0.18327272727272728,
            0.18377272727272728,
        ],
        vec![
            0.0,
            15.0,
            19.282032302755088,
            22.459666924148337,
            24.852813742385703,
            26.6515138991168,
            27.979589711327122,
            28.92304845413264,
            29.54451150103322,
            29.891252930760572,
            30.0,
            3.0,
            3.0,
        ],
        vec![
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            -2.220446049250313e-16,
            0.0,
            0.0,
            0.9981618744961699,
            0.9981786141748574,
        ],
    )?;
    Ok(Material::DamageConcrete {
        e: ModelBuilder::E_CONCRETE,
        nu: ModelBuilder::NU_CONCRETE,
        tension,
        compression,
        regularization: 8.97663211186248,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_deterministic() {
        let builder = ModelBuilder::new(MaterialModel::Nonlinear);
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mesh_and_frame_counts() {
        let model = ModelBuilder::new(MaterialModel::Nonlinear).build().unwrap();
        assert_eq!(model.node_count(), 121);
        // 100 shells + 40 perimeter frames
        assert_eq!(model.element_count(), 140);

        let unframed = ModelBuilder::new(MaterialModel::Nonlinear)
            .frame_edges(false)
            .build()
            .unwrap();
        assert_eq!(unframed.element_count(), 100);
    }

    #[test]
    fn boundary_conditions_pin_corners_and_ridge() {
        let model = ModelBuilder::new(MaterialModel::Nonlinear).build().unwrap();
        let fixed: Vec<_> = model.supports().map(|(id, _)| id).collect();
        // base and crown corners via the elevation planes, the two side
        // corners via tolerance search, plus the ridge midpoint node
        assert_eq!(fixed, vec![1, 11, 61, 111, 121]);
        for (_, support) in model.supports() {
            assert_eq!(support.num_restrained(), 6);
        }
    }

    #[test]
    fn fix_near_with_tiny_tolerance_matches_nothing() {
        let mut model = ModelBuilder::new(MaterialModel::Linear).build().unwrap();
        let before: Vec<_> = model.supports().collect();
        // a point strictly between grid nodes
        let matched = model.fix_near(Point3::new(0.05, 0.0, 0.05), 0.01);
        assert_eq!(matched, 0);
        let after: Vec<_> = model.supports().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn fix_near_at_a_corner_matches_the_corner_node() {
        let mut model = ModelBuilder::new(MaterialModel::Linear)
            .frame_edges(false)
            .build()
            .unwrap();
        let corner = Point3::new(-33.282 * 12.0, 0.0, 49.923 * 12.0);
        let matched = model.fix_near(corner, 0.1);
        assert_eq!(matched, 1);
        assert_eq!(model.support(11), Some(Support::fixed()));
    }

    #[test]
    fn linear_and_nonlinear_modes_swap_the_shell_materials() {
        let linear = ModelBuilder::new(MaterialModel::Linear).build().unwrap();
        assert!(matches!(
            linear.materials().next(),
            Some((tags::SHELL_CONCRETE, Material::ElasticIsotropic { .. }))
        ));

        let nonlinear = ModelBuilder::new(MaterialModel::Nonlinear).build().unwrap();
        assert!(matches!(
            nonlinear.materials().next(),
            Some((tags::SHELL_CONCRETE, Material::DamageConcrete { .. }))
        ));
    }

    #[test]
    fn duplicate_and_dangling_references_are_rejected() {
        let mut model = Model::new();
        model
            .add_material(1, Material::Elastic { e: 30000.0 })
            .unwrap();
        assert!(matches!(
            model.add_material(1, Material::Elastic { e: 1.0 }),
            Err(PushoverError::DuplicateMaterial(1))
        ));
        assert!(matches!(
            model.add_section(
                1,
                Section::LayeredShell(LayeredShell::new(vec![ShellLayer {
                    material: 9,
                    thickness: 1.0
                }]))
            ),
            Err(PushoverError::MaterialNotFound(9))
        ));
        assert!(matches!(
            model.add_material(
                2,
                Material::RebarLayer {
                    steel: 7,
                    angle_deg: 0.0
                }
            ),
            Err(PushoverError::MaterialNotFound(7))
        ));
    }
}
