use super::filters::AdvertisementFilter;
use super::serializers::AdvertisementSerializer;
use super::models::Advertisement;
use classifieds_auth::owner_permissions;
use classifieds_db::Manager;
use classifieds_views::ModelViewSet;

pub type AdvertisementViewSet = ModelViewSet<AdvertisementSerializer, AdvertisementFilter>;

/// ViewSet for advertisements.
///
/// Anyone may list and filter. Creating and editing need an authenticated
/// user, and every action on an existing advertisement is limited to its
/// creator.
pub fn advertisement_viewset(manager: Manager<Advertisement>) -> AdvertisementViewSet {
	ModelViewSet::new("advertisements", manager, AdvertisementSerializer)
		.with_filterset(AdvertisementFilter)
		.with_permissions(owner_permissions)
}
