use serde::{Deserialize, Serialize};
use vector_features::{
    FacadeMaterial, FenceMaterial, PathMaterial, PitchType, RoofMaterial, WallType,
};

/// Textures of ground-level geometry, projected and hugging alike. The discriminant is the
/// texture id in the buffers, so the renderer's texture array must use the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProjectedTexture {
    Asphalt,
    AsphaltMarked,
    Concrete,
    Cobblestone,
    Dirt,
    Sand,
    Wood,
    Pavement,
    Footway,
    Cycleway,
    Runway,
    Railway,
    Tramway,
    Grass,
    ManicuredGrass,
    Garden,
    Rock,
    Construction,
    Farmland,
    Helipad,
    PitchGeneric,
    PitchFootball,
    PitchBasketball,
    PitchTennis,
    FenceWood,
    FenceChainLink,
    FenceMetal,
    FenceConcrete,
    Hedge,
    WallStone,
    WallBrick,
    WallConcrete,
    Water,
}

impl ProjectedTexture {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn path_material(material: PathMaterial) -> ProjectedTexture {
        match material {
            PathMaterial::Asphalt => ProjectedTexture::Asphalt,
            PathMaterial::Concrete => ProjectedTexture::Concrete,
            PathMaterial::Wood => ProjectedTexture::Wood,
            PathMaterial::Cobblestone => ProjectedTexture::Cobblestone,
            PathMaterial::Dirt => ProjectedTexture::Dirt,
            PathMaterial::Sand => ProjectedTexture::Sand,
        }
    }

    pub fn pitch(pitch_type: PitchType) -> ProjectedTexture {
        match pitch_type {
            PitchType::Generic => ProjectedTexture::PitchGeneric,
            PitchType::Football => ProjectedTexture::PitchFootball,
            PitchType::Basketball => ProjectedTexture::PitchBasketball,
            PitchType::Tennis => ProjectedTexture::PitchTennis,
        }
    }

    pub fn fence(material: FenceMaterial) -> ProjectedTexture {
        match material {
            FenceMaterial::Wood => ProjectedTexture::FenceWood,
            FenceMaterial::ChainLink => ProjectedTexture::FenceChainLink,
            FenceMaterial::Metal => ProjectedTexture::FenceMetal,
            FenceMaterial::Concrete => ProjectedTexture::FenceConcrete,
        }
    }

    pub fn wall(wall_type: WallType) -> ProjectedTexture {
        match wall_type {
            WallType::Hedge => ProjectedTexture::Hedge,
            WallType::Stone => ProjectedTexture::WallStone,
            WallType::Brick => ProjectedTexture::WallBrick,
            WallType::Concrete => ProjectedTexture::WallConcrete,
        }
    }
}

/// Textures of buildings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExtrudedTexture {
    FacadePlaster,
    FacadePlasterNoWindows,
    FacadeBrick,
    FacadeBrickNoWindows,
    FacadeWood,
    FacadeGlass,
    FacadeConcrete,
    FacadeConcreteNoWindows,
    RoofGeneric,
    RoofTiles,
    RoofMetal,
    RoofConcrete,
    RoofThatch,
    RoofWood,
    RoofGrass,
    RoofGlass,
}

impl ExtrudedTexture {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn facade(material: FacadeMaterial, windows: bool) -> ExtrudedTexture {
        match (material, windows) {
            (FacadeMaterial::Plaster, true) => ExtrudedTexture::FacadePlaster,
            (FacadeMaterial::Plaster, false) => ExtrudedTexture::FacadePlasterNoWindows,
            (FacadeMaterial::Brick, true) => ExtrudedTexture::FacadeBrick,
            (FacadeMaterial::Brick, false) => ExtrudedTexture::FacadeBrickNoWindows,
            (FacadeMaterial::Wood, _) => ExtrudedTexture::FacadeWood,
            (FacadeMaterial::Glass, _) => ExtrudedTexture::FacadeGlass,
            (FacadeMaterial::Concrete, true) => ExtrudedTexture::FacadeConcrete,
            (FacadeMaterial::Concrete, false) => ExtrudedTexture::FacadeConcreteNoWindows,
        }
    }

    pub fn roof(material: RoofMaterial) -> ExtrudedTexture {
        match material {
            RoofMaterial::Default => ExtrudedTexture::RoofGeneric,
            RoofMaterial::Tiles => ExtrudedTexture::RoofTiles,
            RoofMaterial::Metal => ExtrudedTexture::RoofMetal,
            RoofMaterial::Concrete => ExtrudedTexture::RoofConcrete,
            RoofMaterial::Thatch => ExtrudedTexture::RoofThatch,
            RoofMaterial::Wood => ExtrudedTexture::RoofWood,
            RoofMaterial::Grass => ExtrudedTexture::RoofGrass,
            RoofMaterial::Glass => ExtrudedTexture::RoofGlass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(ProjectedTexture::Asphalt.id(), 0);
        assert_eq!(ProjectedTexture::Water.id(), 32);
        assert_eq!(ExtrudedTexture::RoofGeneric.id(), 8);
        assert_eq!(
            ExtrudedTexture::facade(FacadeMaterial::Brick, false),
            ExtrudedTexture::FacadeBrickNoWindows
        );
    }
}
