use super::custom::{latelierderoxane, ricardocuisine};
use super::fixups::{Field, Fixup};
use super::{Site, Strategy};

const FIRST_CATEGORY: &[Fixup] = &[Fixup::FirstItem(Field::Category)];

const FORKSOVERKNIVES: &[Fixup] = &[
    Fixup::text(".core-paragraph", Field::Description),
    Fixup::StripAnchors(Field::Category),
    Fixup::LastToken(Field::Category),
];

const JAMIEOLIVER: &[Fixup] = &[Fixup::attr(
    "meta[property='og:image']",
    "content",
    Field::Image,
)];

const JUSTONECOOKBOOK: &[Fixup] = &[Fixup::Default(Field::Cuisine, "Japanese")];

const NYTIMES: &[Fixup] = &[
    Fixup::html(".topnote p", Field::Description),
    Fixup::StripAnchors(Field::Instructions),
];

const SMITTENKITCHEN: &[Fixup] = &[
    Fixup::text(".jetpack-recipe-ingredients li", Field::Ingredients),
    Fixup::text(".jetpack-recipe-directions p", Field::Instructions),
];

pub(super) static SITES: &[Site] = &[
    Site::new("allrecipes.com", Strategy::LdJson),
    Site::new("bbcgoodfood.com", Strategy::GraphOrLdJson),
    Site::new("bonappetit.com", Strategy::LdJson),
    Site::new("budgetbytes.com", Strategy::Graph),
    Site::new("chefkoch.de", Strategy::LdJson).with_fixups(FIRST_CATEGORY),
    Site::new("cookieandkate.com", Strategy::Graph),
    Site::new("delish.com", Strategy::LdJson),
    Site::new("eatingwell.com", Strategy::LdJson),
    Site::new("epicurious.com", Strategy::LdJson),
    Site::new("food.com", Strategy::LdJson),
    Site::new("foodnetwork.com", Strategy::LdJson),
    Site::new("forksoverknives.com", Strategy::GraphOrLdJson).with_fixups(FORKSOVERKNIVES),
    Site::new("halfbakedharvest.com", Strategy::Graph),
    Site::new("jamieoliver.com", Strategy::LdJson).with_fixups(JAMIEOLIVER),
    Site::new("justonecookbook.com", Strategy::Graph).with_fixups(JUSTONECOOKBOOK),
    Site::new("kitchenstories.com", Strategy::LdJson),
    Site::new("latelierderoxane.com", Strategy::Custom(latelierderoxane)),
    Site::new("leanandgreenrecipes.net", Strategy::LdJson),
    Site::new("lecker.de", Strategy::GraphOrLdJson).with_fixups(FIRST_CATEGORY),
    Site::new("lifestyleofafoodie.com", Strategy::GraphOrLdJson),
    Site::new("livelytable.com", Strategy::GraphOrLdJson),
    Site::new("marmiton.org", Strategy::LdJson),
    Site::new("minimalistbaker.com", Strategy::Graph),
    Site::new("nytimes.com", Strategy::LdJson).with_fixups(NYTIMES),
    Site::new("pinchofyum.com", Strategy::Graph),
    Site::new("recipetineats.com", Strategy::Graph),
    Site::new("ricardocuisine.com", Strategy::Custom(ricardocuisine)),
    Site::new("sallysbakingaddiction.com", Strategy::Graph),
    Site::new("seriouseats.com", Strategy::LdJson),
    Site::new("simplyrecipes.com", Strategy::LdJson),
    Site::new("smittenkitchen.com", Strategy::Default).with_fixups(SMITTENKITCHEN),
    Site::new("tasty.co", Strategy::LdJson),
    Site::new("thekitchn.com", Strategy::Website),
    Site::new("thepioneerwoman.com", Strategy::LdJson),
];
